//! Generation of the traffic demand of the crossing.
use anyhow::Result;
use log::info;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

const HEADER: &str = r#"<routes>
    <vType id="typeWE" accel="0.8" decel="4.5" sigma="0.5" length="5" minGap="2.5" maxSpeed="16.67" guiShape="passenger"/>
    <vType id="typeNS" accel="0.8" decel="4.5" sigma="0.5" length="7" minGap="3" maxSpeed="25" guiShape="bus"/>

    <route id="right" edges="51o 1i 2o 52i" />
    <route id="left" edges="52o 2i 1o 51i" />
    <route id="down" edges="54o 4i 3o 53i" />"#;

/// Writes a SUMO route file with random departures on three routes.
///
/// At every second, a vehicle departs on each route independently with the
/// route's probability. The output only depends on the configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RouteGenerator {
    /// Seed of the random number generator.
    pub seed: u64,

    /// The number of simulated seconds with departures.
    pub n_steps: usize,

    /// Departure probability per second from west to east.
    pub p_we: f64,

    /// Departure probability per second from east to west.
    pub p_ew: f64,

    /// Departure probability per second from north to south.
    pub p_ns: f64,
}

impl Default for RouteGenerator {
    fn default() -> Self {
        Self {
            seed: 42,
            n_steps: 50000,
            p_we: 1. / 10.,
            p_ew: 1. / 11.,
            p_ns: 1. / 30.,
        }
    }
}

impl RouteGenerator {
    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the number of simulated seconds.
    pub fn n_steps(mut self, v: usize) -> Self {
        self.n_steps = v;
        self
    }

    /// Writes the routes and returns the number of vehicles.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<usize> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let routes = [
            ("right", "typeWE", self.p_we, ""),
            ("left", "typeWE", self.p_ew, ""),
            ("down", "typeNS", self.p_ns, r#" color="1,0,0""#),
        ];
        let mut n_vehicles = 0;

        writeln!(out, "{}", HEADER)?;
        for t in 0..self.n_steps {
            for (route, vtype, p, extra) in routes.iter() {
                if rng.gen::<f64>() < *p {
                    writeln!(
                        out,
                        r#"    <vehicle id="{}_{}" type="{}" route="{}" depart="{}"{}/>"#,
                        route, n_vehicles, vtype, route, t, extra
                    )?;
                    n_vehicles += 1;
                }
            }
        }
        writeln!(out, "</routes>")?;
        out.flush()?;
        Ok(n_vehicles)
    }

    /// Writes the routes to a file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let n_vehicles = self.write_to(BufWriter::new(File::create(path)?))?;
        info!("Wrote {} vehicles to {:?}", n_vehicles, path);
        Ok(n_vehicles)
    }
}
