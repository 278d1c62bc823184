//! Staff two distribution centers over an eight-week horizon and print the
//! resulting plan. Run with `cargo run --example staffing`.

use allocmodel::{staffing, SolveOptions};
use allocmodel_highs::HighsBackend;

fn main() {
    tracing_subscriber::fmt::init();

    let facilities = ["DC1", "DC2"];
    let weeks = 8;
    let mut data = staffing::StaffingData {
        facilities: facilities.iter().map(|s| s.to_string()).collect(),
        weeks,
        hours_per_week: 40.0,
        max_overtime: 10.0,
        // DC2 is a satellite site that can only operate alongside DC1.
        open_requires: vec![("DC2".to_string(), "DC1".to_string())],
        ..Default::default()
    };
    for (i, f) in facilities.iter().enumerate() {
        let f = f.to_string();
        data.initial_staff.insert(f.clone(), 12.0);
        data.capacity.insert(f.clone(), 60.0);
        data.wage.insert(f.clone(), 700.0 + 50.0 * i as f64);
        data.overtime_cost.insert(f.clone(), 26.0);
        data.hire_cost.insert(f.clone(), 320.0);
        data.fire_cost.insert(f.clone(), 520.0);
        data.fixed_cost.insert(f.clone(), 1500.0);
        for w in 1..=weeks {
            let seasonal = if w >= 5 { 160.0 } else { 0.0 };
            data.demand.insert((f.clone(), w), 380.0 + seasonal + 20.0 * i as f64);
        }
    }

    let mut model = staffing::build(&data).expect("model construction");
    let status = model
        .solve(&mut HighsBackend::new(), &SolveOptions::default())
        .expect("submission");

    if status.is_optimal() {
        print!("{}", staffing::report(&model).expect("report"));
    } else {
        println!("{}", allocmodel::status_line(status));
    }
}
