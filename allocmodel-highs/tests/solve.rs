//! End-to-end solves through HiGHS: the flow and balance invariants the
//! shipped instances promise, plus status propagation for infeasible input.

use allocmodel::*;
use allocmodel_highs::HighsBackend;

const TOL: f64 = 1e-5;

fn staffing_data(facilities: &[&str], weeks: i64) -> staffing::StaffingData {
    let mut data = staffing::StaffingData {
        facilities: facilities.iter().map(|s| s.to_string()).collect(),
        weeks,
        hours_per_week: 40.0,
        max_overtime: 10.0,
        ..Default::default()
    };
    for f in facilities {
        let f = f.to_string();
        data.initial_staff.insert(f.clone(), 10.0);
        data.capacity.insert(f.clone(), 50.0);
        data.wage.insert(f.clone(), 700.0);
        data.overtime_cost.insert(f.clone(), 25.0);
        data.hire_cost.insert(f.clone(), 300.0);
        data.fire_cost.insert(f.clone(), 500.0);
        data.fixed_cost.insert(f.clone(), 1000.0);
        for w in 1..=weeks {
            // Rising demand forces hiring later in the horizon.
            data.demand.insert((f.clone(), w), 300.0 + 40.0 * w as f64);
        }
    }
    data
}

#[test]
fn staff_flow_invariant_holds_in_solved_model() {
    let data = staffing_data(&["DC1", "DC2"], 4);
    let mut model = staffing::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);

    for f in &data.facilities {
        let fk = Key::from(f.as_str());
        for w in 2..=data.weeks {
            let staff = model.value("staff", &[fk.clone(), w.into()]).unwrap();
            let staff_prev = model.value("staff", &[fk.clone(), (w - 1).into()]).unwrap();
            let fire = model.value("fire", &[fk.clone(), w.into()]).unwrap();
            let hire_prev = model.value("hire", &[fk.clone(), (w - 1).into()]).unwrap();
            assert!(
                (staff - staff_prev + fire - hire_prev).abs() < TOL,
                "flow violated at {}, week {}",
                f,
                w
            );
        }
    }
}

#[test]
fn single_week_boundary_balances_against_initial_staff() {
    let mut data = staffing_data(&["DC1"], 1);
    data.capacity.insert("DC1".to_string(), 1000.0);
    data.demand.insert(("DC1".to_string(), 1), 200.0);
    let mut model = staffing::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);

    let staff = model.value("staff", &["DC1".into(), 1.into()]).unwrap();
    let fire = model.value("fire", &["DC1".into(), 1.into()]).unwrap();
    assert!((staff - (10.0 - fire)).abs() < TOL);
}

#[test]
fn cross_facility_rule_is_respected() {
    let mut data = staffing_data(&["DC1", "DC2"], 2);
    data.open_requires.push(("DC2".to_string(), "DC1".to_string()));
    // DC1 has no demand of its own; only the rule can force it open.
    for w in 1..=2 {
        data.demand.insert(("DC1".to_string(), w), 0.0);
    }
    let mut model = staffing::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);

    let open1 = model.value("open", &["DC1".into()]).unwrap();
    let open2 = model.value("open", &["DC2".into()]).unwrap();
    assert!(open2 <= open1 + TOL);
    // DC2 serves demand, so it is open, which drags DC1 open too.
    assert!(open2 > 0.5);
    assert!(open1 > 0.5);
}

#[test]
fn staffing_report_is_consistent_with_the_engine_objective() {
    let data = staffing_data(&["DC1"], 3);
    let mut model = staffing::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);

    let reporter = Reporter::new(&model).unwrap();
    reporter.verify_objective(1e-6).unwrap();
    let text = staffing::report(&model).unwrap();
    assert!(text.starts_with("Objective: "));
    assert!(text.contains("DC1 is OPEN"));
}

#[test]
fn impossible_demand_is_reported_infeasible() {
    let mut data = staffing_data(&["DC1"], 1);
    // Nobody to staff: zero capacity but positive demand.
    data.capacity.insert("DC1".to_string(), 0.0);
    let mut model = staffing::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Infeasible);
    assert_eq!(model.state(), State::Failed);
    assert!(staffing::report(&model).is_err());
    assert_eq!(
        staffing::failure_line(&model).as_deref(),
        Some("Solve terminated: INFEASIBLE")
    );
}

fn production_data() -> production::ProductionData {
    let products = vec!["widget".to_string(), "gadget".to_string()];
    let materials = vec!["steel".to_string()];
    let months = 3;
    let mut data = production::ProductionData {
        products: products.clone(),
        materials: materials.clone(),
        months,
        ..Default::default()
    };
    for i in &products {
        data.price.insert(i.clone(), 20.0);
        data.machine_hours.insert(i.clone(), 1.0);
        data.holding_cost.insert(i.clone(), 1.0);
        data.backorder_cost.insert(i.clone(), 4.0);
        data.initial_inventory.insert(i.clone(), 5.0);
        data.max_inventory.insert(i.clone(), 100.0);
        for t in 1..=months {
            data.demand.insert((i.clone(), t), 30.0 + 10.0 * t as f64);
        }
    }
    data.material_cost.insert("steel".to_string(), 2.0);
    for t in 1..=months {
        data.material_avail.insert(("steel".to_string(), t), 500.0);
        data.machine_capacity.insert(t, 120.0);
    }
    data.usage.insert(("steel".to_string(), "widget".to_string()), 2.0);
    data.usage.insert(("steel".to_string(), "gadget".to_string()), 3.0);
    data
}

#[test]
fn inventory_balance_invariant_holds_in_solved_model() {
    let data = production_data();
    let mut model = production::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);

    for i in &data.products {
        let ik = Key::from(i.as_str());
        let mut net_prev = data.initial_inventory[i];
        for t in 1..=data.months {
            let inv = model.value("inventory", &[ik.clone(), t.into()]).unwrap();
            let back = model.value("backorder", &[ik.clone(), t.into()]).unwrap();
            let make = model.value("make", &[ik.clone(), t.into()]).unwrap();
            let demand = data.demand[&(i.clone(), t)];
            assert!(
                ((inv - back) - net_prev - make + demand).abs() < TOL,
                "balance violated for {} in month {}",
                i,
                t
            );
            net_prev = inv - back;
        }
        // Backorders are cleared by the end of the horizon.
        let last = model.value("backorder", &[ik.clone(), data.months.into()]).unwrap();
        assert!(last.abs() < TOL);
    }
}

#[test]
fn zero_demand_zero_cost_run_is_all_zeros() {
    let mut data = production_data();
    for i in &data.products {
        data.price.insert(i.clone(), 0.0);
        data.holding_cost.insert(i.clone(), 0.0);
        data.backorder_cost.insert(i.clone(), 0.0);
        data.initial_inventory.insert(i.clone(), 0.0);
        data.max_inventory.insert(i.clone(), 0.0);
        for t in 1..=data.months {
            data.demand.insert((i.clone(), t), 0.0);
        }
    }
    data.material_cost.insert("steel".to_string(), 0.0);
    for t in 1..=data.months {
        data.material_avail.insert(("steel".to_string(), t), 0.0);
        data.machine_capacity.insert(t, 0.0);
    }

    let mut model = production::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);
    let sol = model.solution().unwrap();
    assert!(sol.objective.abs() < 1e-6);
    for i in &data.products {
        let ik = Key::from(i.as_str());
        for t in [1, data.months] {
            assert!(model.value("inventory", &[ik.clone(), t.into()]).unwrap().abs() < TOL);
            assert!(model.value("backorder", &[ik.clone(), t.into()]).unwrap().abs() < TOL);
        }
    }
}

#[test]
fn production_report_is_consistent_with_the_engine_objective() {
    let data = production_data();
    let mut model = production::build(&data).unwrap();
    let status = model.solve(&mut HighsBackend::new(), &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);

    Reporter::new(&model).unwrap().verify_objective(1e-6).unwrap();
    let text = production::report(&model).unwrap();
    assert!(text.starts_with("Objective: "));
    assert!(text.contains("-- widget --"));
    assert!(text.contains("-- steel --"));
}

#[test]
fn time_limit_is_forwarded_without_retry() {
    // A generous limit on a tiny model: still optimal, proving the option
    // path does not disturb a normal solve.
    let data = staffing_data(&["DC1"], 2);
    let mut model = staffing::build(&data).unwrap();
    let opts = SolveOptions::with_time_limit(std::time::Duration::from_secs(30));
    let status = model.solve(&mut HighsBackend::new(), &opts).unwrap();
    assert_eq!(status, SolveStatus::Optimal);
}
