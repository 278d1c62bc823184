//! Reporter behaviour over scripted solutions: recomputation of objective
//! components, table rendering and the solved-state contract.

use allocmodel::*;

/// Two facilities, two periods, one quantity variable and a binary
/// selection, small enough to read the expected output by eye.
fn toy_model() -> Model {
    let mut m = Model::new("toy");
    m.declare_set("sites", ["A", "B"]).unwrap();
    m.declare_set("periods", 1..=2).unwrap();
    m.declare_parameter("gain", &["sites"], ParamRange::Any, |t| {
        Some(if t[0] == Key::from("A") { 3.0 } else { 2.0 })
    })
    .unwrap();
    m.declare_variable("pick", &["sites"], VarDomain::Binary, Bounds::none()).unwrap();
    m.declare_variable("flow", &["sites", "periods"], VarDomain::NonNegativeContinuous, Bounds::none())
        .unwrap();
    m.add_family(Family::new("cap", &["sites", "periods"]).body(|m, t| {
        Ok((m.var_expr("flow", t)?, Relation::Le, m.var_expr("pick", &t[..1])?.scale(10.0)))
    }))
    .unwrap();

    let mut gain = LinearExpr::zero();
    let mut upkeep = LinearExpr::zero();
    for s in ["A", "B"] {
        let sk = Key::from(s);
        let g = m.param("gain", std::slice::from_ref(&sk)).unwrap();
        upkeep.add_term(m.var("pick", std::slice::from_ref(&sk)).unwrap(), -1.0);
        for p in 1..=2i64 {
            gain.add_term(m.var("flow", &[sk.clone(), p.into()]).unwrap(), g);
        }
    }
    m.set_objective(Sense::Maximize, vec![("gain", gain), ("upkeep", upkeep)]).unwrap();
    m.freeze().unwrap();
    m
}

/// pick = [1, 0], flow = [5, 7, 0, 0] in column order.
fn solved_toy() -> Model {
    let mut m = toy_model();
    let mut backend = dummy::Backend::optimal(vec![1.0, 0.0, 5.0, 7.0, 0.0, 0.0]);
    let status = m.solve(&mut backend, &SolveOptions::default()).unwrap();
    assert_eq!(status, SolveStatus::Optimal);
    m
}

#[test]
fn reporting_requires_a_solved_model() {
    let m = toy_model();
    match Reporter::new(&m) {
        Err(ReportError::NotSolved(State::Frozen)) => {}
        other => panic!("unexpected: {:?}", other.err()),
    }
}

#[test]
fn components_sum_matches_reported_objective() {
    let m = solved_toy();
    let r = Reporter::new(&m).unwrap();
    let components = r.components();
    assert_eq!(components[0], ("gain".to_string(), 3.0 * 5.0 + 3.0 * 7.0));
    assert_eq!(components[1], ("upkeep".to_string(), -1.0));
    r.verify_objective(1e-6).unwrap();
    assert!((r.recomputed_objective() - 35.0).abs() < 1e-6);
}

#[test]
fn objective_mismatch_is_detected() {
    let mut m = toy_model();
    // An engine that misreports its aggregate by one.
    let mut backend = dummy::Backend::scripted(Solution {
        status: SolveStatus::Optimal,
        objective: 36.0,
        values: vec![1.0, 0.0, 5.0, 7.0, 0.0, 0.0],
        message: None,
    });
    m.solve(&mut backend, &SolveOptions::default()).unwrap();
    let r = Reporter::new(&m).unwrap();
    assert!(matches!(
        r.verify_objective(1e-6),
        Err(ReportError::ObjectiveMismatch { reported, .. }) if reported == 36.0
    ));
}

#[test]
fn selection_lines_list_only_set_cells() {
    let m = solved_toy();
    let r = Reporter::new(&m).unwrap();
    assert_eq!(r.selection_lines("pick").unwrap(), vec!["A is OPEN".to_string()]);
}

#[test]
fn quantity_table_has_one_row_per_period() {
    let m = solved_toy();
    let r = Reporter::new(&m).unwrap();
    let prefix = [Key::from("A")];
    let table = r
        .quantity_table("A", "periods", &[TableColumn {
            header: "flow",
            family: "flow",
            prefix: &prefix,
        }])
        .unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "-- A --");
    assert!(lines[1].ends_with("flow"));
    assert!(lines[2].ends_with("5.00"));
    assert!(lines[3].ends_with("7.00"));
}

#[test]
fn empty_period_set_renders_header_only() {
    let mut m = Model::new("empty");
    m.declare_set("periods", std::iter::empty::<i64>()).unwrap();
    m.declare_variable("x", &["periods"], VarDomain::NonNegativeContinuous, Bounds::none())
        .unwrap();
    m.set_objective(Sense::Minimize, vec![("nothing", LinearExpr::zero())]).unwrap();
    m.freeze().unwrap();
    let mut backend = dummy::Backend::optimal(vec![]);
    m.solve(&mut backend, &SolveOptions::default()).unwrap();
    let r = Reporter::new(&m).unwrap();
    let table = r
        .quantity_table("nothing", "periods", &[TableColumn {
            header: "x",
            family: "x",
            prefix: &[],
        }])
        .unwrap();
    assert_eq!(table.lines().count(), 2);
}

#[test]
fn staffing_report_prints_objective_open_lines_and_tables() {
    let mut data = staffing::StaffingData {
        facilities: vec!["F1".to_string()],
        weeks: 2,
        hours_per_week: 40.0,
        max_overtime: 8.0,
        ..Default::default()
    };
    data.initial_staff.insert("F1".to_string(), 10.0);
    data.capacity.insert("F1".to_string(), 20.0);
    data.wage.insert("F1".to_string(), 700.0);
    data.overtime_cost.insert("F1".to_string(), 25.0);
    data.hire_cost.insert("F1".to_string(), 300.0);
    data.fire_cost.insert("F1".to_string(), 500.0);
    data.fixed_cost.insert("F1".to_string(), 1000.0);
    data.demand.insert(("F1".to_string(), 1), 400.0);
    data.demand.insert(("F1".to_string(), 2), 400.0);

    let mut model = staffing::build(&data).unwrap();
    // Columns: open[F1], staff[F1,1..2], hire[F1,1..2], fire[F1,1..2],
    // overtime[F1,1..2].
    let values = vec![1.0, 10.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let mut backend = dummy::Backend::optimal(values);
    model.solve(&mut backend, &SolveOptions::default()).unwrap();

    let text = staffing::report(&model).unwrap();
    assert!(text.starts_with("Objective: "));
    assert!(text.contains("F1 is OPEN"));
    assert!(text.contains("-- F1 --"));
    assert!(text.contains("wages: 14000.00"));
    assert!(staffing::failure_line(&model).is_none());
}

#[test]
fn failed_solve_yields_status_line_and_no_report() {
    let mut data = staffing::StaffingData {
        facilities: vec!["F1".to_string()],
        weeks: 1,
        hours_per_week: 40.0,
        max_overtime: 8.0,
        ..Default::default()
    };
    data.initial_staff.insert("F1".to_string(), 10.0);
    data.capacity.insert("F1".to_string(), 20.0);
    data.wage.insert("F1".to_string(), 700.0);
    data.overtime_cost.insert("F1".to_string(), 25.0);
    data.hire_cost.insert("F1".to_string(), 300.0);
    data.fire_cost.insert("F1".to_string(), 500.0);
    data.fixed_cost.insert("F1".to_string(), 1000.0);
    data.demand.insert(("F1".to_string(), 1), 400.0);

    let mut model = staffing::build(&data).unwrap();
    let mut backend = dummy::Backend::failing(SolveStatus::Unbounded);
    model.solve(&mut backend, &SolveOptions::default()).unwrap();
    assert!(staffing::report(&model).is_err());
    assert_eq!(
        staffing::failure_line(&model).as_deref(),
        Some("Solve terminated: UNBOUNDED")
    );
}
