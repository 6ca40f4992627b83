//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Study;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut study: Study) -> Result<Study, ProjectError> {
    while study.version < LATEST_VERSION {
        study = migrate_one_version(study)?;
    }
    Ok(study)
}

fn migrate_one_version(study: Study) -> Result<Study, ProjectError> {
    match study.version {
        0 => migrate_v0_to_v1(study),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

// v0 studies stored fan heat as a fraction (0.05) rather than a percentage.
fn migrate_v0_to_v1(mut study: Study) -> Result<Study, ProjectError> {
    if study.design.fan_heat_pct > 0.0 && study.design.fan_heat_pct <= 0.2 {
        study.design.fan_heat_pct *= 100.0;
    }
    study.version = 1;
    Ok(study)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    #[test]
    fn v0_fan_heat_becomes_percent() {
        let study = Study {
            version: 0,
            name: "Legacy".to_string(),
            fluid: FluidDef::default(),
            design: DesignDef {
                fan_heat_pct: 0.05,
                total_it_load_mw: Some(5.0),
                ..DesignDef::default()
            },
            layout: None,
            chillers: ChillerDef::default(),
            pipe_catalog: vec![],
        };
        let migrated = migrate_to_latest(study).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert!((migrated.design.fan_heat_pct - 5.0).abs() < 1e-12);
    }

    #[test]
    fn latest_is_untouched() {
        let study = Study {
            version: LATEST_VERSION,
            name: "Current".to_string(),
            fluid: FluidDef::default(),
            design: DesignDef {
                fan_heat_pct: 0.1,
                total_it_load_mw: Some(5.0),
                ..DesignDef::default()
            },
            layout: None,
            chillers: ChillerDef::default(),
            pipe_catalog: vec![],
        };
        let migrated = migrate_to_latest(study.clone()).unwrap();
        assert_eq!(migrated, study);
    }
}
