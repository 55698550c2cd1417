//! Damping ratio and pole-placement design over the full overshoot range

use approx::assert_relative_eq;
use thermal_pid::design::{damping_ratio, overshoot_from_damping, solve_design, DesignSpec};
use thermal_pid::plant::PhysicalParameters;
use thermal_pid::Error;

#[test]
fn test_damping_residual_across_range() {
    for i in 1..100 {
        let mp = i as f64 / 100.0;
        let zeta = damping_ratio(mp).unwrap();
        assert!(zeta > 0.0 && zeta < 1.0, "Mp={} gave zeta={}", mp, zeta);
        assert!(
            (overshoot_from_damping(zeta) - mp).abs() < 1e-6,
            "Mp={} gave zeta={}",
            mp,
            zeta
        );
    }
}

#[test]
fn test_damping_decreases_with_overshoot() {
    let zetas: Vec<f64> = (1..100).map(|i| damping_ratio(i as f64 / 100.0).unwrap()).collect();
    for pair in zetas.windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[test]
fn test_damping_invalid_overshoot() {
    for mp in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
        assert!(matches!(damping_ratio(mp), Err(Error::InvalidSpec(_))), "Mp={}", mp);
    }
}

#[test]
fn test_reference_cases() {
    let params = PhysicalParameters::default();

    let one = solve_design(&DesignSpec::new(0.10, 8.0), &params).unwrap();
    assert_relative_eq!(one.damping_ratio, 0.5911550338, epsilon = 1e-8);
    assert_relative_eq!(one.natural_frequency, 0.8458018141, epsilon = 1e-8);
    assert_relative_eq!(one.third_pole, 3.5, epsilon = 1e-12);

    let two = solve_design(&DesignSpec::new(0.05, 5.0), &params).unwrap();
    assert_relative_eq!(two.damping_ratio, 0.6901067306, epsilon = 1e-8);
    assert_relative_eq!(two.natural_frequency, 1.15924, epsilon = 1e-5);
    assert_relative_eq!(two.third_pole, 5.6, epsilon = 1e-12);
    assert_relative_eq!(two.gains.kp, 1.13376, epsilon = 1e-5);
    assert_relative_eq!(two.gains.ki, 0.83617, epsilon = 1e-5);
    assert_relative_eq!(two.gains.kd, 61.0 / 90.0, epsilon = 1e-12);

    assert_ne!(one.gains, two.gains);
    assert!(two.gains.kp > one.gains.kp);
    assert!(two.gains.ki > one.gains.ki);
    assert!(two.gains.kd > one.gains.kd);
}

#[test]
fn test_design_places_target_poles() {
    // Coefficients of the designed loop must match the target polynomial
    let params = PhysicalParameters::default();
    for (mp, ts) in [(0.02, 3.0), (0.10, 8.0), (0.25, 12.0), (0.5, 20.0)] {
        let design = solve_design(&DesignSpec::new(mp, ts), &params).unwrap();
        let system = thermal_pid::plant::build_closed_loop(&params, &design.gains).unwrap();
        let den = system.denominator().coeffs();
        let lead = den[0];
        let target = design.target_polynomial();
        for (a, b) in den.iter().zip(target.coeffs()) {
            assert_relative_eq!(a / lead, *b, epsilon = 1e-9, max_relative = 1e-9);
        }
    }
}

#[test]
fn test_settling_time_scales_frequency() {
    let params = PhysicalParameters::default();
    let slow = solve_design(&DesignSpec::new(0.1, 10.0), &params).unwrap();
    let fast = solve_design(&DesignSpec::new(0.1, 5.0), &params).unwrap();
    assert_relative_eq!(slow.damping_ratio, fast.damping_ratio);
    assert_relative_eq!(fast.natural_frequency, 2.0 * slow.natural_frequency, epsilon = 1e-12);
}
