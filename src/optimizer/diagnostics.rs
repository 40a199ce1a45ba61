use crate::domain::Instance;

/// Explains an infeasible instance in terms of the bound it violates.
///
/// Total production can never exceed either Σ hub capacity or the product
/// obtainable from all supply, and every source can reach every hub, so the
/// minimum production target is satisfiable exactly when it is within both.
pub fn explain_infeasibility(instance: &Instance) -> String {
    let params = instance.parameters();
    let target = params.minimum_total_production;
    let capacity = instance.total_capacity();
    let convertible = instance.total_supply() * params.conversion_factor;

    let mut reasons = Vec::new();
    if target > capacity {
        reasons.push(format!(
            "minimum production {target:.2} t exceeds total hub capacity {capacity:.2} t"
        ));
    }
    if target > convertible {
        reasons.push(format!(
            "minimum production {target:.2} t exceeds convertible supply {convertible:.2} t \
             ({:.2} t available x conversion factor {})",
            instance.total_supply(),
            params.conversion_factor
        ));
    }

    if reasons.is_empty() {
        "no feasible routing satisfies the supply, capacity and minimum production constraints"
            .to_string()
    } else {
        reasons.join("; ")
    }
}
