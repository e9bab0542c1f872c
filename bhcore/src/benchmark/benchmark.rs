use std::time::Instant;

use crate::simulation::error::SimError;
use crate::simulation::forces::{AccelSet, Acceleration, BarnesHutGravity, DirectGravity};
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// Helper to build a deterministic set of `n` bodies spread over `spread`
/// units around the origin (no rand needed)
pub fn make_bodies(n: usize, spread: f64) -> Result<Vec<Body>, SimError> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * spread,
                (i_f * 0.13).cos() * spread,
                (i_f * 0.07).sin() * spread,
            );
            Body::new(x, 1.0, NVec3::zeros())
        })
        .collect()
}

/// Time one gravity evaluation, direct vs Barnes–Hut, for growing n
/// Prints CSV so it can be pasted straight into a spreadsheet
pub fn bench_gravity(ns: &[usize]) -> Result<(), SimError> {
    let params = Parameters::default();

    println!("N,direct_ms,bh_ms,bh_par_ms");

    for &n in ns {
        let bodies = make_bodies(n, 0.4 * params.width)?;
        let mut out = vec![NVec3::zeros(); n];

        let direct = DirectGravity { g: params.g };
        let bh = BarnesHutGravity { params, parallel: false };
        let bh_par = BarnesHutGravity { params, parallel: true };

        // Warm up
        bh.acceleration(&bodies, &mut out)?;

        let ms_direct = time_ms(|| direct.acceleration(&bodies, &mut out))?;
        let ms_bh = time_ms(|| bh.acceleration(&bodies, &mut out))?;
        let ms_bh_par = time_ms(|| bh_par.acceleration(&bodies, &mut out))?;

        println!("{},{:.6},{:.6},{:.6}", n, ms_direct, ms_bh, ms_bh_par);
    }
    Ok(())
}

/// Time full ticks (force evaluation plus integration) with the tree
pub fn bench_step(n: usize, steps: usize) -> Result<f64, SimError> {
    let params = Parameters::default();
    let mut bodies = make_bodies(n, 0.4 * params.width)?;
    let forces = AccelSet::new().with(BarnesHutGravity { params, parallel: true });

    let t0 = Instant::now();
    for _ in 0..steps {
        euler_step(&mut bodies, &forces, &params)?;
    }
    Ok(t0.elapsed().as_secs_f64() * 1000.0 / steps.max(1) as f64)
}

fn time_ms(mut f: impl FnMut() -> Result<(), SimError>) -> Result<f64, SimError> {
    let t0 = Instant::now();
    f()?;
    Ok(t0.elapsed().as_secs_f64() * 1000.0)
}
