use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;
use tracing::{info, Level};

use pandel::geometry::*;
use pandel::input::*;
use pandel::likelihood::*;

/// Sensor positions, keyed by "string-om".
fn read_geometry(input: &Config) -> Result<Geometry, Box<dyn Error>> {
    let mut geometry = Geometry::new();

    for name in input.keys("geometry")? {
        let path = format!("geometry:{}", name);
        let key: SensorKey = name.parse()?;
        let expected = "a position [x, y, z]";
        let r: Vec<f64> = input.read(&path).map_err(|e| e.expecting(expected))?;
        let r = ThreeVector::from_slice(&r)
            .ok_or_else(|| InputError::conversion(&path, &name).expecting(expected))?;
        geometry.insert(key, r);
    }

    Ok(geometry)
}

/// Pulse series as lists of (time, charge) pairs, keyed by "string-om".
fn read_pulses(input: &Config) -> Result<PulseSeriesMap, Box<dyn Error>> {
    let mut pulses = PulseSeriesMap::new();

    for name in input.keys("pulses")? {
        let path = format!("pulses:{}", name);
        let key: SensorKey = name.parse()?;
        let expected = "a list of [time, charge] pairs";
        let rows: Vec<Vec<f64>> = input.read(&path).map_err(|e| e.expecting(expected))?;
        let series = rows.iter()
            .map(|row| match row.as_slice() {
                [time, charge] => Ok(Pulse::new(*time, *charge)),
                _ => Err(InputError::conversion(&path, &name).expecting(expected)),
            })
            .collect::<Result<Vec<Pulse>, _>>()?;
        pulses.insert(key, series);
    }

    Ok(pulses)
}

/// Values of a track parameter: the loop in the `scan` section if there
/// is one, otherwise the single value of the `track` section.
fn scan_values(input: &Config, name: &str, default: f64) -> Result<Vec<f64>, InputError> {
    let path = format!("scan:{}", name);
    match input.read_loop(&path) {
        Ok(v) => Ok(v),
        Err(e) if e.kind() == InputErrorKind::Location && e.path() == path => Ok(vec![default]),
        Err(e) => Err(e),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let path = args.iter()
        .find(|a| !a.starts_with('-'))
        .map(PathBuf::from)
        .ok_or_else(InputError::file)?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    println!("{} event from {}...", "Reading".bold().cyan(), path.display().to_string().bold().blue());

    let mut input = Config::from_file(&path)?;
    input.with_context("constants")?;

    let setup = LikelihoodSetup::from_config(&input)?;
    let geometry = read_geometry(&input)?;
    let pulses = read_pulses(&input)?;

    let position: Vec<f64> = input.read("track:position")?;
    let position = ThreeVector::from_slice(&position)
        .ok_or_else(|| InputError::conversion("track:position", "position").expecting("a position [x, y, z]"))?;
    let zenith: f64 = input.read("track:zenith")?;
    let azimuth: f64 = input.read("track:azimuth")?;
    let time: f64 = input.read_optional("track:time")?.unwrap_or(0.0);

    let mut llh = setup.build()?;
    llh.set_geometry(&geometry);
    llh.set_pulse_map(&pulses)?;

    info!(sensors = geometry.len(), pulsed = pulses.len(), hits = llh.multiplicity(), "event loaded");

    let zeniths = scan_values(&input, "zenith", zenith)?;
    let azimuths = scan_values(&input, "azimuth", azimuth)?;
    let times = scan_values(&input, "time", time)?;

    let runtime = Instant::now();
    let mut best: Option<(f64, Track)> = None;
    let mut count = 0;

    for &zenith in zeniths.iter() {
        for &azimuth in azimuths.iter() {
            for &time in times.iter() {
                let track = Track::from_angles(position, zenith, azimuth, time);
                let value = llh.log_likelihood(&track);
                count += 1;

                println!(
                    "zenith = {:>9.4} deg, azimuth = {:>9.4} deg, t = {:>10.2} ns: log L = {:.6}",
                    track.zenith().to_degrees(), track.azimuth().to_degrees(), time, value,
                );

                if verbose {
                    for c in llh.contributions(&track) {
                        println!("\t{:>8}: t_res = {:>10.3} ns, ln(L + noise) = {:.6}", c.key, c.t_res, c.log_term);
                    }
                }

                if best.map_or(true, |(b, _)| value > b) {
                    best = Some((value, track));
                }
            }
        }
    }

    if let Some((value, track)) = best {
        println!(
            "{} {} hypotheses in {:.3} s, {} hits. Best log L = {} for {}.",
            "Evaluated".bold().bright_green(),
            count,
            runtime.elapsed().as_secs_f64(),
            llh.multiplicity(),
            format!("{:.6}", value).bold(),
            track,
        );
    }

    Ok(())
}
