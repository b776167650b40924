use nufft::trace::{set_tracing, take_operator_traces, Direction};
use nufft::{LinearOperator, NonUniformFft, NufftOptions};
use num_complex::Complex;

// Tracing is process-wide, so both states are checked in one test.
#[test]
fn operators_trace_only_when_enabled() {
    let frequencies = [-2.0, -0.5, 0.25, 1.5, 3.0];
    let x = vec![Complex::new(1.0, -1.0); 8];

    let quiet = NonUniformFft::<f64>::with_options(
        8,
        &frequencies,
        NufftOptions::default().with_name("quiet"),
    )
    .unwrap();
    for _ in 0..1000 {
        quiet.apply(&x).unwrap();
    }
    assert!(take_operator_traces().is_empty());

    set_tracing(true);
    let loud = NonUniformFft::<f64>::with_options(
        8,
        &frequencies,
        NufftOptions::default().with_name("loud"),
    )
    .unwrap();
    let y = loud.apply(&x).unwrap();
    loud.apply_adjoint(&y).unwrap();
    quiet.apply(&x).unwrap();
    set_tracing(false);
    loud.apply(&x).unwrap();

    let traces = take_operator_traces();
    let directions = traces
        .iter()
        .filter(|trace| trace.operator == "loud")
        .map(|trace| trace.direction)
        .collect::<Vec<_>>();
    assert_eq!(
        directions,
        vec![Direction::Plan, Direction::Forward, Direction::Adjoint]
    );
    assert_eq!(traces.len(), 4);
    assert!(traces[1].to_json_line().contains(r#""direction":"forward""#));
    assert_eq!((traces[1].rows, traces[1].cols), (5, 8));
    assert!(take_operator_traces().is_empty());
}
