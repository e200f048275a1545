use std::{env, error::Error, fs};

use boltzmann::{
    params::Params,
    training::{PretrainSpec, RbmBuilder},
};
use log::info;
use ndarray::ArrayView2;

const SIDE: usize = 3;

const DEFAULT_SPEC: &str = r#"{
    "rbm": {
        "visible": 9,
        "hidden": 6,
        "visible_unit": "binary",
        "hidden_unit": "binary",
        "k": 1,
        "cost": "xent",
        "seed": 42
    },
    "learning_rate": 0.05,
    "epochs": 500,
    "batch_size": 4,
    "init": { "normal": { "std_dev": 0.01 } }
}"#;

/// Every bars-and-stripes pattern of a `SIDE x SIDE` grid, without duplicates.
fn bars_and_stripes() -> Vec<f32> {
    let mut data = Vec::new();

    for mask in 0..(1u32 << SIDE) {
        let lit = |i: usize| if mask & (1 << i) != 0 { 1. } else { 0. };

        let bars: Vec<f32> = (0..SIDE * SIDE).map(|i| lit(i % SIDE)).collect();
        data.extend(&bars);

        if mask != 0 && mask != (1 << SIDE) - 1 {
            data.extend((0..SIDE * SIDE).map(|i| lit(i / SIDE)));
        }
    }

    data
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let spec = match env::args().nth(1) {
        Some(path) => {
            info!("reading spec from {path}");
            PretrainSpec::from_json(&fs::read_to_string(path)?)?
        }
        None => PretrainSpec::from_json(DEFAULT_SPEC)?,
    };

    let data = bars_and_stripes();
    let (mut pretrainer, mut params) = RbmBuilder::new().build_pretrainer(&spec, data.clone())?;
    let scores = pretrainer.fit(&mut params)?;

    if let (Some(first), Some(last)) = (scores.first(), scores.last()) {
        info!("score went from {first:.4} to {last:.4} in {} epochs", scores.len());
    }

    let rbm = pretrainer.rbm_mut();
    let layout = rbm.layout();
    let store = Params::new(layout, &params)?;
    let v = ArrayView2::from_shape((data.len() / layout.visible(), layout.visible()), &data)?;

    let h = rbm.prop_up(&store, v, false)?;
    let reconstruction = rbm.prop_down(&store, h.view())?;
    let error = (&reconstruction - &v).mapv(f32::abs).mean().unwrap_or_default();

    info!("mean absolute reconstruction error: {error:.4}");
    Ok(())
}
