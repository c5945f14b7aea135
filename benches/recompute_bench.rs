//! Quick benchmark of full evaluation against partial recompute

use h2retrofit::model::ids;
use h2retrofit::{AircraftModel, SeatingClass, SeatingConfig};
use std::time::Instant;

fn evaluate_everything(model: &mut AircraftModel) {
    let ids: Vec<String> = model.engine().node_ids().map(str::to_string).collect();
    for id in ids {
        let _ = model.get(&id);
    }
}

fn main() {
    let iterations = 10_000u32;

    println!("Recompute Performance Test");
    println!("==========================\n");

    // Cold: build and evaluate every node
    let start = Instant::now();
    for _ in 0..iterations {
        let mut model = AircraftModel::baseline().unwrap();
        evaluate_everything(&mut model);
    }
    let elapsed = start.elapsed();
    println!("Build + full evaluation");
    println!("  Time for {} iterations: {:?}", iterations, elapsed);
    println!("  Per operation: {:?}\n", elapsed / iterations);

    // Warm: one input changes, downstream nodes recompute
    let cases: [(&str, fn(&mut AircraftModel, u32)); 3] = [
        (ids::FUSELAGE_LENGTH, |m, i| {
            m.set_fuselage_length(37.0 + f64::from(i % 10) * 0.1).unwrap()
        }),
        (ids::CABIN_SEATING, |m, i| {
            m.set_seating(SeatingConfig::new(vec![SeatingClass::new("economy", 20 + i % 5, 6, 0.76)]))
                .unwrap()
        }),
        (ids::WING_PLANFORM, |m, i| {
            let mut planform = h2retrofit::rules::Planform::a320();
            planform.sweep_deg += f64::from(i % 3);
            m.set_planform(planform).unwrap()
        }),
    ];

    for (id, change) in cases {
        let mut model = AircraftModel::baseline().unwrap();
        evaluate_everything(&mut model);
        let before = model.engine().total_invocations();

        let start = Instant::now();
        for i in 0..iterations {
            change(&mut model, i);
            let _ = model.cg_percent_mac();
        }
        let elapsed = start.elapsed();
        let runs = model.engine().total_invocations() - before;

        println!("Change {:24}", id);
        println!("  Time for {} iterations: {:?}", iterations, elapsed);
        println!("  Per operation: {:?}", elapsed / iterations);
        println!("  Rule invocations per change: {:.1}\n", runs as f64 / f64::from(iterations));
    }

    // Memo hits only
    let mut model = AircraftModel::baseline().unwrap();
    evaluate_everything(&mut model);
    let start = Instant::now();
    for _ in 0..iterations * 10 {
        let _ = model.cg_percent_mac();
    }
    let elapsed = start.elapsed();
    println!("Cached read of cg.percent_mac");
    println!("  Per operation: {:?}", elapsed / (iterations * 10));
}
