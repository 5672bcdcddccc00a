//! Parse input configuration file

use std::path::Path;
use std::ops::Add;
use yaml_rust::{YamlLoader, yaml::Yaml};
use evalexpr::*;

use crate::constants::*;

mod error;
mod types;

pub use error::*;
pub use types::*;

/// Represents the input configuration, which defines the event,
/// the ice model and the likelihood settings, as well as any
/// named constants used to define them.
pub struct Config {
    input: Yaml,
    ctx: HashMapContext,
}

impl Config {
    /// Loads a configuration file.
    /// Fails if the file cannot be opened or if it is not
    /// YAML-formatted.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|_| InputError::file())?;
        Self::from_string(&contents)
    }

    /// Loads a YAML configuration from a string.
    /// Fails if the string is not formatted correctly.
    pub fn from_string(s: &str) -> Result<Self, InputError> {
        let input = YamlLoader::load_from_str(s)
            .map_err(|_| InputError::file())?;
        let input = input.first()
            .ok_or(InputError::file())?;

        Ok(Config {
            input: input.clone(),
            ctx: HashMapContext::new(),
        })
    }

    /// Loads units (lengths in m, times in ns), constants and
    /// mathematical functions.
    /// Also loads and evaluates mathematical expressions
    /// that are given in the specified `section`.
    pub fn with_context(&mut self, section: &str) -> Result<&mut Self, InputError> {
        use helper::context_function;

        let mut ctx = context_map! {
            "m" => 1.0,
            "cm" => 0.01,
            "km" => 1.0e3,
            "ns" => 1.0,
            "us" => 1.0e3,
            "ms" => 1.0e6,
            "c" => C_VACUUM,
            "n_phase" => PHASE_INDEX,
            "n_group" => GROUP_INDEX,
            "pi" => std::f64::consts::PI,
            "degree" => std::f64::consts::PI / 180.0,
        }.map_err(|_| InputError::conversion(section, "default context"))?;

        context_function!(ctx, section, "sqrt",   f64::sqrt);
        context_function!(ctx, section, "cbrt",   f64::cbrt);
        context_function!(ctx, section, "abs",    f64::abs);
        context_function!(ctx, section, "exp",    f64::exp);
        context_function!(ctx, section, "ln",     f64::ln);
        context_function!(ctx, section, "sin",    f64::sin);
        context_function!(ctx, section, "cos",    f64::cos);
        context_function!(ctx, section, "tan",    f64::tan);
        context_function!(ctx, section, "asin",   f64::asin);
        context_function!(ctx, section, "acos",   f64::acos);
        context_function!(ctx, section, "atan",   f64::atan);
        context_function!(ctx, section, "atan2",  f64::atan2, 2);
        context_function!(ctx, section, "floor",  f64::floor);
        context_function!(ctx, section, "ceil",   f64::ceil);
        context_function!(ctx, section, "round",  f64::round);

        self.ctx = ctx;

        // Read in from 'constants' block if it exists
        if self.input[section].is_badvalue() {
            return Ok(self);
        }

        let block = self.input[section].as_hash()
            .ok_or_else(|| InputError::conversion(section, section))?;

        for (a, b) in block {
            // grab the value, if possible
            let (key, value) = match (a, b) {
                (Yaml::String(k), Yaml::Integer(i)) => (Some(k), Some(*i as f64)),
                (Yaml::String(k), Yaml::Real(s)) => (Some(k), s.parse::<f64>().ok()),
                (Yaml::String(k), Yaml::String(s)) => (Some(k), eval_number_with_context(s, &self.ctx).ok()),
                _ => (None, None),
            };

            // insert it into the context so it's available for the next read
            match (key, value) {
                (Some(k), Some(v)) => {
                    self.ctx.set_value(k.clone(), Value::from(v))
                        .map_err(|_| InputError::conversion(section, k))?
                },
                // found a key, value pair but parsing failed
                (Some(k), None) => return Err(InputError::conversion(section, k)),
                _ => {},
            }
        }

        Ok(self)
    }

    /// Follows a path of colon-separated sections, e.g.
    /// `'section:subsection:key'`, to a node of the configuration.
    fn locate(&self, path: &str) -> Result<&Yaml, InputError> {
        path.split(':')
            .try_fold(&self.input, |y, s| {
                if y[s].is_badvalue() {
                    Err(InputError::location(path, s))
                } else {
                    Ok(&y[s])
                }
            })
    }

    /// Locates a key-value pair in the configuration file and attempts
    /// to parse the value as the specified type.
    /// The path to the key-value pair is specified by a string of colon-separated
    /// sections, e.g. `'section:subsection:subsubsection:key'`.
    pub fn read<T, S>(&self, path: S) -> Result<T, InputError>
    where
        T: FromYaml,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        let value = self.locate(path)?;
        let last = path.rsplit(':').next().unwrap_or(path);
        T::from_yaml(value.clone(), &self.ctx)
            .map_err(|_| InputError::conversion(path, last))
    }

    /// Like `Config::read`, but a missing key is not an error.
    /// A key that is present but cannot be parsed still is.
    pub fn read_optional<T, S>(&self, path: S) -> Result<Option<T>, InputError>
    where
        T: FromYaml,
        S: AsRef<str>,
    {
        match self.read(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == InputErrorKind::Location => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns the keys of the mapping at `path`, in the order they appear.
    pub fn keys<S: AsRef<str>>(&self, path: S) -> Result<Vec<String>, InputError> {
        let path = path.as_ref();
        let hash = self.locate(path)?
            .as_hash()
            .ok_or_else(|| InputError::conversion(path, path))?;

        let keys = hash.keys()
            .filter_map(|k| match k {
                Yaml::String(s) => Some(s.clone()),
                Yaml::Integer(i) => Some(i.to_string()),
                _ => None,
            })
            .collect();

        Ok(keys)
    }

    /// Parses a string argument and evaluates it using the default context,
    /// e.g. `"90.0 * degree"`, or an expression involving names defined in
    /// the constants block.
    pub fn evaluate<S: AsRef<str>>(&self, arg: S) -> Option<f64> {
        eval_number_with_context(arg.as_ref(), &self.ctx).ok()
    }

    /// Locates a key-value pair in the configuration file and attempts
    /// to parse it as a looped variable, returning a Vec of the values.
    /// The loop is defined by a `start`, `stop` and `step`:
    ///
    /// ```
    /// use pandel::input::Config;
    /// let text: &str = "---
    ///     x:
    ///         start: 1.0
    ///         stop: 1.5
    ///         step: 0.25
    /// ";
    ///
    /// let values: Vec<f64> = Config::from_string(&text).unwrap()
    ///     .read_loop("x").unwrap();
    ///
    /// assert_eq!(values, vec![1.0, 1.25, 1.5]);
    /// ```
    pub fn read_loop<T, S>(&self, path: S) -> Result<Vec<T>, InputError>
    where
        T: FromYaml + PartialOrd + Add<Output=T> + Copy,
        S: AsRef<str> {
        let key = path.as_ref();

        if self.read::<T, _>(format!("{}{}", key, ":start").as_str()).is_err() {
            let value = self.read(path)?;
            let v = vec![value];
            Ok(v)
        }
        else { // 'start' value found
            let start = self.read(format!("{}{}", key, ":start").as_str())?;
            let stop = self.read(format!("{}{}", key, ":stop").as_str())?;
            let step: T = self.read(format!("{}{}", key, ":step").as_str())?;

            // a step that does not advance would never terminate
            if !(start + step > start) {
                return Err(InputError::conversion(key, "step"));
            }

            let mut v: Vec<T> = Vec::new();
            let mut x = start;
            while x <= stop {
                v.push(x);
                x = x + step;
            }
            Ok(v)
        }
    }
}

mod helper {
    macro_rules! context_function {
        ($ctx:expr, $section:expr, $name:literal, $func:expr) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let x = arg.as_number()?;
                    Ok(Value::Float($func(x)))
                })
            ).map_err(|_| InputError::conversion($section, $name))?
        };
        ($ctx:expr, $section:expr, $name:literal, $func:expr, 2) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let arg = arg.as_fixed_len_tuple(2)?;
                    let x = arg[0].as_number()?;
                    let y = arg[1].as_number()?;
                    Ok(Value::Float($func(x, y)))
                })
            ).map_err(|_| InputError::conversion($section, $name))?
        };
    }

    pub(super) use context_function;
}

#[cfg(test)]
mod tests {
    use std::f64::consts;
    use super::*;

    #[test]
    fn config_parser() {
        let text = "---
        ice:
          absorption_length: 0.098 * km
          tau: 557
          scattering_length: 3330.0 * cm

        track:
          zenith: 120.0 * degree
          position: [0.0, b, 1.0, 2.0 * a]
          bad: [0.0, none]

        pulses:
          21-30: [[100.0, 1.5], [x0 + 20.0, 0.5]]
          -3-2: [[40.0, 2.0]]

        constants:
          N: 2.0
          a: N * pi
          b: 17.0
          x0: 100.0 * ns

        deep:
          nested:
            section:
              key: 1.0
        ";

        let mut config = Config::from_string(&text).unwrap();
        config.with_context("constants").unwrap();

        // Evaluates units
        let absorption: f64 = config.read("ice:absorption_length").unwrap();
        assert_eq!(absorption, 98.0);

        // Implicit conversion from integer to f64
        let tau: f64 = config.read("ice:tau").unwrap();
        assert_eq!(tau, 557.0);

        let zenith: f64 = config.read("track:zenith").unwrap();
        assert!((zenith - 2.0 * consts::PI / 3.0).abs() < 1.0e-15);

        // array of f64
        let r: Vec<f64> = config.read("track:position").unwrap();
        assert_eq!(r.len(), 4);
        assert_eq!(r[1], 17.0);
        assert_eq!(r[3], 4.0 * consts::PI);

        let s: Result<Vec<f64>, _> = config.read("track:bad");
        assert!(s.is_err());

        // nested arrays
        let keys = config.keys("pulses").unwrap();
        assert_eq!(keys, vec!["21-30".to_owned(), "-3-2".to_owned()]);
        let pulses: Vec<Vec<f64>> = config.read("pulses:21-30").unwrap();
        assert_eq!(pulses, vec![vec![100.0, 1.5], vec![120.0, 0.5]]);

        let key: f64 = config.read("deep:nested:section:key").unwrap();
        assert_eq!(key, 1.0);

        // optional values
        let missing: Option<f64> = config.read_optional("ice:p1").unwrap();
        assert!(missing.is_none());
        let present: Option<f64> = config.read_optional("ice:tau").unwrap();
        assert_eq!(present, Some(557.0));
        let wrong: Result<Option<f64>, _> = config.read_optional("track:bad");
        assert!(wrong.is_err());

        // evaluate arb string
        let val = config.evaluate("1.0 / (1.0 + b)").unwrap();
        assert_eq!(val, 1.0 / 18.0);
    }

    #[test]
    fn looper() {
        // Test extraction of single value
        let text: &str = "---
        scan:
            zenith: 10.0
        ";
        let config = Config::from_string(&text).unwrap();
        let values: Vec<f64> = config.read_loop("scan:zenith").unwrap();
        assert_eq!(values, vec![10.0; 1]);

        // Test extraction of looped values
        let text: &str = "---
        scan:
            zenith:
                start: 1.0
                stop: 10.0
                step: 2.0
        ";
        let config = Config::from_string(&text).unwrap();
        let values: Vec<f64> = config.read_loop("scan:zenith").unwrap();
        assert_eq!(values, vec![1.0, 3.0, 5.0, 7.0, 9.0]);

        let text: &str = "---
        scan:
            zenith:
                start: 1.0
                stop: 10.0
                step: 0.0
        ";
        let config = Config::from_string(&text).unwrap();
        assert!(config.read_loop::<f64, _>("scan:zenith").is_err());
    }
}
