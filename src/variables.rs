//! The variables published for the European gridded observations dataset.
//!
//! Each variable has a long catalogue name, the short code used in payload
//! file names, and the reduction applied when resampling to yearly buckets.

use crate::resample::Reduction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableSpec {
    pub name: &'static str,
    pub code: &'static str,
    pub reduction: Reduction,
}

/// Variables available in `insitu-gridded-observations-europe`. Temperatures,
/// humidity and radiation average over the year; precipitation accumulates.
pub const VARIABLES: &[VariableSpec] = &[
    VariableSpec {
        name: "maximum_temperature",
        code: "tx",
        reduction: Reduction::Mean,
    },
    VariableSpec {
        name: "mean_temperature",
        code: "tg",
        reduction: Reduction::Mean,
    },
    VariableSpec {
        name: "minimum_temperature",
        code: "tn",
        reduction: Reduction::Mean,
    },
    VariableSpec {
        name: "precipitation_amount",
        code: "rr",
        reduction: Reduction::Sum,
    },
    VariableSpec {
        name: "relative_humidity",
        code: "hu",
        reduction: Reduction::Mean,
    },
    VariableSpec {
        name: "surface_shortwave_downwelling_radiation",
        code: "qq",
        reduction: Reduction::Mean,
    },
];

pub fn lookup(name: &str) -> Option<&'static VariableSpec> {
    VARIABLES.iter().find(|v| v.name == name)
}

pub fn from_code(code: &str) -> Option<&'static VariableSpec> {
    VARIABLES.iter().find(|v| v.code == code)
}

/// Identifies the variable a payload file belongs to. Data files are named
/// `<code>_<product>_<resolution>_<period>_v<version>.dat`.
pub fn for_file_name(file_name: &str) -> Option<&'static VariableSpec> {
    let code = file_name.split('_').next()?;
    from_code(code)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_assign_mean_to_temperature_like_variables() {
        for name in [
            "maximum_temperature",
            "mean_temperature",
            "minimum_temperature",
            "relative_humidity",
            "surface_shortwave_downwelling_radiation",
        ] {
            let spec = lookup(name).unwrap();
            assert_eq!(spec.reduction, Reduction::Mean, "{}", name);
        }
    }

    #[test]
    fn should_assign_sum_to_precipitation() {
        let spec = lookup("precipitation_amount").unwrap();
        assert_eq!(spec.reduction, Reduction::Sum);
    }

    #[test]
    fn should_not_find_unsupported_variable() {
        assert!(lookup("snow_depth").is_none());
    }

    #[test]
    fn should_find_variable_by_code() {
        assert_eq!(from_code("tg").unwrap().name, "mean_temperature");
        assert_eq!(from_code("rr").unwrap().name, "precipitation_amount");
        assert!(from_code("xx").is_none());
    }

    #[test]
    fn should_identify_variable_from_file_name() {
        let spec = for_file_name("tg_ens_mean_0.1deg_full_period_v29.0e.dat").unwrap();
        assert_eq!(spec.name, "mean_temperature");

        assert!(for_file_name("readme.txt").is_none());
    }
}
