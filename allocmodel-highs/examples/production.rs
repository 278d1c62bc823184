//! Plan material purchases and a product mix over six months and print the
//! schedule. Run with `cargo run --example production`.

use allocmodel::{production, SolveOptions};
use allocmodel_highs::HighsBackend;

fn main() {
    tracing_subscriber::fmt::init();

    let products = ["widget", "gadget"];
    let materials = ["steel", "resin"];
    let months = 6;
    let mut data = production::ProductionData {
        products: products.iter().map(|s| s.to_string()).collect(),
        materials: materials.iter().map(|s| s.to_string()).collect(),
        months,
        ..Default::default()
    };
    for (i, p) in products.iter().enumerate() {
        let p = p.to_string();
        data.price.insert(p.clone(), 24.0 + 6.0 * i as f64);
        data.machine_hours.insert(p.clone(), 1.0 + 0.5 * i as f64);
        data.holding_cost.insert(p.clone(), 1.2);
        data.backorder_cost.insert(p.clone(), 5.0);
        data.initial_inventory.insert(p.clone(), 10.0);
        data.max_inventory.insert(p.clone(), 120.0);
        for t in 1..=months {
            data.demand.insert((p.clone(), t), 40.0 + 8.0 * ((t + i as i64) % 3) as f64);
        }
    }
    for m in materials {
        let m = m.to_string();
        data.material_cost.insert(m.clone(), 2.5);
        for t in 1..=months {
            data.material_avail.insert((m.clone(), t), 400.0);
        }
    }
    data.usage.insert(("steel".to_string(), "widget".to_string()), 2.0);
    data.usage.insert(("steel".to_string(), "gadget".to_string()), 1.0);
    data.usage.insert(("resin".to_string(), "widget".to_string()), 0.5);
    data.usage.insert(("resin".to_string(), "gadget".to_string()), 2.0);
    for t in 1..=months {
        data.machine_capacity.insert(t, 150.0);
    }

    let mut model = production::build(&data).expect("model construction");
    let status = model
        .solve(&mut HighsBackend::new(), &SolveOptions::default())
        .expect("submission");

    if status.is_optimal() {
        print!("{}", production::report(&model).expect("report"));
    } else {
        println!("{}", allocmodel::status_line(status));
    }
}
