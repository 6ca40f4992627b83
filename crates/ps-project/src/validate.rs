//! Study validation logic.

use std::collections::HashSet;

use crate::schema::{
    ChillerDef, DesignDef, HallLoadsDef, LayoutDef, PipeSizeDef, RedundancyDef, Study,
};

/// Highest fan-heat percentage accepted.
pub const MAX_FAN_HEAT_PCT: f64 = 20.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing field: {field} ({reason})")]
    MissingField { field: String, reason: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be a positive number"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be zero or greater"))
    }
}

pub fn validate_study(study: &Study) -> Result<(), ValidationError> {
    if study.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: study.version,
        });
    }

    if study.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    validate_design(&study.design)?;

    match &study.layout {
        Some(layout) => validate_layout(layout)?,
        None if study.design.total_it_load_mw.is_none() => {
            return Err(ValidationError::MissingField {
                field: "design.total_it_load_mw".to_string(),
                reason: "required when the study has no layout".to_string(),
            });
        }
        None => {}
    }

    validate_chillers(&study.chillers)?;
    validate_pipe_catalog(&study.pipe_catalog)?;

    Ok(())
}

fn validate_design(design: &DesignDef) -> Result<(), ValidationError> {
    positive("design.delta_t_f", design.delta_t_f)?;
    positive("design.max_velocity_fps", design.max_velocity_fps)?;
    positive("design.max_dp_psi_per_100ft", design.max_dp_psi_per_100ft)?;
    if let Some(r) = design.roughness_mm {
        non_negative("design.roughness_mm", r)?;
    }
    if !(0.0..=MAX_FAN_HEAT_PCT).contains(&design.fan_heat_pct) {
        return Err(invalid(
            "design.fan_heat_pct",
            design.fan_heat_pct,
            "must be between 0 and 20",
        ));
    }
    if let Some(mw) = design.total_it_load_mw {
        non_negative("design.total_it_load_mw", mw)?;
    }
    if let Some(ft) = design.run_length_ft {
        positive("design.run_length_ft", ft)?;
    }
    if design.risers == Some(0) {
        return Err(invalid("design.risers", 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_layout(layout: &LayoutDef) -> Result<(), ValidationError> {
    if layout.spec.trim().is_empty() {
        return Err(invalid("layout.spec", "\"\"", "must not be empty"));
    }
    match &layout.loads {
        HallLoadsDef::Uniform { it_load_mw } => {
            non_negative("layout.loads.it_load_mw", *it_load_mw)?;
        }
        HallLoadsDef::PerHall { default_mw, halls } => {
            non_negative("layout.loads.default_mw", *default_mw)?;
            for (name, mw) in halls {
                if name.trim().is_empty() {
                    return Err(invalid(
                        "layout.loads.halls",
                        "\"\"",
                        "hall names must not be empty",
                    ));
                }
                non_negative(&format!("layout.loads.halls.{name}"), *mw)?;
            }
        }
    }
    Ok(())
}

fn validate_chillers(chillers: &ChillerDef) -> Result<(), ValidationError> {
    if chillers.max_units < 1 {
        return Err(invalid("chillers.max_units", chillers.max_units, "must be at least 1"));
    }
    if let RedundancyDef::NPlusPercent { percent } = chillers.redundancy
        && !(percent.is_finite() && percent > 0.0 && percent <= 100.0)
    {
        return Err(invalid(
            "chillers.redundancy.percent",
            percent,
            "must be in (0, 100]",
        ));
    }
    non_negative("chillers.electricity_rate_per_kwh", chillers.electricity_rate_per_kwh)?;
    positive("chillers.annual_hours", chillers.annual_hours)?;
    if chillers.annual_hours > 8784.0 {
        return Err(invalid(
            "chillers.annual_hours",
            chillers.annual_hours,
            "exceeds hours in a year",
        ));
    }
    if let Some(band) = &chillers.loading_band
        && !(band.min_pct >= 0.0 && band.max_pct <= 100.0 && band.min_pct < band.max_pct)
    {
        return Err(invalid(
            "chillers.loading_band",
            format!("{}..{}", band.min_pct, band.max_pct),
            "need 0 <= min < max <= 100",
        ));
    }
    Ok(())
}

fn validate_pipe_catalog(catalog: &[PipeSizeDef]) -> Result<(), ValidationError> {
    let mut labels = HashSet::new();
    for pipe in catalog {
        if !labels.insert(pipe.label.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: pipe.label.clone(),
                context: "pipe_catalog".to_string(),
            });
        }
        positive(&format!("pipe_catalog.{}.nominal_in", pipe.label), pipe.nominal_in)?;
        positive(
            &format!("pipe_catalog.{}.inside_diameter_in", pipe.label),
            pipe.inside_diameter_in,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use std::collections::BTreeMap;

    fn quick_study() -> Study {
        Study {
            version: 1,
            name: "Quick".to_string(),
            fluid: FluidDef::default(),
            design: DesignDef {
                total_it_load_mw: Some(10.0),
                ..DesignDef::default()
            },
            layout: None,
            chillers: ChillerDef::default(),
            pipe_catalog: vec![],
        }
    }

    fn field_of(err: ValidationError) -> String {
        match err {
            ValidationError::InvalidValue { field, .. } => field,
            ValidationError::MissingField { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn quick_study_is_valid() {
        validate_study(&quick_study()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut study = quick_study();
        study.version = 99;
        assert_eq!(
            validate_study(&study),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        );
    }

    #[test]
    fn design_errors_name_the_field() {
        let mut study = quick_study();
        study.design.delta_t_f = 0.0;
        assert_eq!(field_of(validate_study(&study).unwrap_err()), "design.delta_t_f");

        let mut study = quick_study();
        study.design.fan_heat_pct = 25.0;
        assert_eq!(field_of(validate_study(&study).unwrap_err()), "design.fan_heat_pct");

        let mut study = quick_study();
        study.design.max_dp_psi_per_100ft = f64::NAN;
        assert_eq!(
            field_of(validate_study(&study).unwrap_err()),
            "design.max_dp_psi_per_100ft"
        );

        let mut study = quick_study();
        study.design.run_length_ft = Some(0.0);
        assert_eq!(field_of(validate_study(&study).unwrap_err()), "design.run_length_ft");
    }

    #[test]
    fn missing_load_without_layout() {
        let mut study = quick_study();
        study.design.total_it_load_mw = None;
        assert_eq!(
            field_of(validate_study(&study).unwrap_err()),
            "design.total_it_load_mw"
        );
    }

    #[test]
    fn negative_hall_load() {
        let mut study = quick_study();
        study.layout = Some(LayoutDef {
            spec: "2x1x1".to_string(),
            include_floors: false,
            riser_mode: RiserModeDef::Independent,
            loads: HallLoadsDef::PerHall {
                default_mw: 1.0,
                halls: BTreeMap::from([("B1".to_string(), -2.0)]),
            },
        });
        assert_eq!(
            field_of(validate_study(&study).unwrap_err()),
            "layout.loads.halls.B1"
        );
    }

    #[test]
    fn chiller_errors() {
        let mut study = quick_study();
        study.chillers.max_units = 0;
        assert_eq!(field_of(validate_study(&study).unwrap_err()), "chillers.max_units");

        let mut study = quick_study();
        study.chillers.redundancy = RedundancyDef::NPlusPercent { percent: 0.0 };
        assert_eq!(
            field_of(validate_study(&study).unwrap_err()),
            "chillers.redundancy.percent"
        );

        let mut study = quick_study();
        study.chillers.loading_band = Some(LoadingBandDef {
            min_pct: 80.0,
            max_pct: 40.0,
        });
        assert_eq!(field_of(validate_study(&study).unwrap_err()), "chillers.loading_band");
    }

    #[test]
    fn duplicate_pipe_labels() {
        let mut study = quick_study();
        let pipe = PipeSizeDef {
            label: "6 in".to_string(),
            nominal_in: 6.0,
            inside_diameter_in: 6.065,
        };
        study.pipe_catalog = vec![pipe.clone(), pipe];
        assert!(matches!(
            validate_study(&study),
            Err(ValidationError::DuplicateId { .. })
        ));
    }
}
