//! YAML-readable types

use yaml_rust::yaml::Yaml;
use evalexpr::{HashMapContext, eval_number_with_context};

/// Types that can be parsed from a YAML-formatted file
pub trait FromYaml: Sized {
    type Error;
    /// Attempt to parse the YAML field as the specified type, using the supplied context for named variables and constants.
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error>;
}

/// Renders a scalar YAML node as a string, ready for evaluation.
fn scalar_string(arg: &Yaml) -> Option<String> {
    match arg {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

impl FromYaml for bool {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        match arg {
            Yaml::Boolean(b) => Ok(b),
            _ => Err(())
        }
    }
}

impl FromYaml for String {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        scalar_string(&arg).ok_or(())
    }
}

impl FromYaml for f64 {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        match arg {
            Yaml::Real(s) => s.parse::<f64>().or(Err(())),
            Yaml::Integer(i) => Ok(i as f64),
            Yaml::String(s) => eval_number_with_context(&s, ctx).or(Err(())),
            _ => Err(())
        }
    }
}

impl FromYaml for Vec<String> {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        match arg {
            Yaml::Array(array) => {
                // every element must be a scalar
                let got: Option<Vec<String>> = array.iter().map(scalar_string).collect();
                match got {
                    Some(v) if !v.is_empty() => Ok(v),
                    _ => Err(()),
                }
            },
            // a single scalar becomes a vec of length 1
            other => scalar_string(&other).map(|s| vec![s]).ok_or(()),
        }
    }
}

impl FromYaml for Vec<f64> {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        let strs: Vec<String> = FromYaml::from_yaml(arg, ctx)?;
        strs.iter()
            .map(|s| eval_number_with_context(s, ctx).or(Err(())))
            .collect()
    }
}

/// A list of rows, e.g. `[[100.0, 1.5], [120.0, 0.5]]`, as used for pulse series.
impl FromYaml for Vec<Vec<f64>> {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        match arg {
            Yaml::Array(rows) => {
                rows.into_iter()
                    .map(|row| match row {
                        Yaml::Array(_) => Vec::<f64>::from_yaml(row, ctx),
                        _ => Err(()),
                    })
                    .collect()
            },
            _ => Err(()),
        }
    }
}
