//! Fitness functions for the benchmark problems.
//!
//! All evaluators are pure. Direction (maximize/minimize) is decided by the
//! algorithm, not here.

use std::f64::consts::{E, PI};

use crate::schema::{EAConfig, GpOpKind, GpProblem, KnapsackItem, ProblemType};

/// Sphere: sum of squares. Minimum 0 at the origin.
pub fn sphere(genes: &[f64]) -> f64 {
    genes.iter().map(|g| g * g).sum()
}

/// Ackley with a = 20, b = 0.2, c = 2π. Minimum 0 at the origin.
pub fn ackley(genes: &[f64]) -> f64 {
    const A: f64 = 20.0;
    const B: f64 = 0.2;
    const C: f64 = 2.0 * PI;

    let d = genes.len() as f64;
    let sum_sq: f64 = genes.iter().map(|g| g * g).sum();
    let sum_cos: f64 = genes.iter().map(|g| (C * g).cos()).sum();

    -A * (-B * (sum_sq / d).sqrt()).exp() - (sum_cos / d).exp() + A + E
}

/// Evaluate real-valued genes against the configured benchmark.
pub fn real_fitness(problem: ProblemType, genes: &[f64]) -> f64 {
    match problem {
        ProblemType::Sphere => sphere(genes),
        ProblemType::Ackley => ackley(genes),
    }
}

/// Result of packing a knapsack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnapsackEvaluation {
    /// Total value, or 0 when over capacity.
    pub fitness: f64,
    pub weight: f64,
    pub is_valid: bool,
}

/// Knapsack with a hard penalty: overweight selections score 0.
///
/// Genes past the end of `items` are ignored.
pub fn knapsack(genes: &[u8], items: &[KnapsackItem], capacity: f64) -> KnapsackEvaluation {
    let (value, weight) = genes
        .iter()
        .zip(items)
        .filter(|(gene, _)| **gene == 1)
        .fold((0.0, 0.0), |(value, weight), (_, item)| {
            (value + item.value, weight + item.weight)
        });

    let is_valid = weight <= capacity;
    KnapsackEvaluation {
        fitness: if is_valid { value } else { 0.0 },
        weight,
        is_valid,
    }
}

/// Operation a GP gene refers to.
///
/// The gene wraps around the table (`gene % len`), so genomes stay valid
/// after the table shrinks. Returns `None` only for an empty table.
pub fn gp_operation(gene: usize, config: &EAConfig) -> Option<GpOpKind> {
    let ops = &config.gp_operations;
    if ops.is_empty() {
        return None;
    }
    Some(ops[gene % ops.len()].kind)
}

fn gp_start(problem: GpProblem, x: f64) -> f64 {
    match problem {
        GpProblem::Linear => 50.0,
        GpProblem::Sine => x,
    }
}

/// Run the genes left to right over an accumulator at the query point `x`.
pub fn evaluate_gp(genes: &[usize], x: f64, config: &EAConfig) -> f64 {
    let mut val = gp_start(config.gp_problem, x);
    for &gene in genes {
        let Some(op) = gp_operation(gene, config) else {
            break;
        };
        val = match op {
            GpOpKind::Add1 => val + 1.0,
            GpOpKind::Sub1 => val - 1.0,
            GpOpKind::Sub10 => val - 10.0,
            GpOpKind::Div2 => (val / 2.0).floor(),
            GpOpKind::Mul2 => val * 2.0,
            GpOpKind::AddX => val + x,
            GpOpKind::Sin => val.sin(),
            GpOpKind::Cos => val.cos(),
            GpOpKind::AddConst => val + 5.0,
            GpOpKind::Nop => val,
        };
    }
    val
}

/// Number of intervals between the sine sample points on [0, 2π].
const SINE_INTERVALS: usize = 10;

/// GP fitness (minimize).
///
/// - Linear: `|f() - 0|`
/// - Sine: sum of squared error against `sin(x)` at 11 points on [0, 2π]
pub fn gp_fitness(genes: &[usize], config: &EAConfig) -> f64 {
    match config.gp_problem {
        GpProblem::Linear => evaluate_gp(genes, 0.0, config).abs(),
        GpProblem::Sine => (0..=SINE_INTERVALS)
            .map(|i| {
                let x = (i as f64 / SINE_INTERVALS as f64) * 2.0 * PI;
                (evaluate_gp(genes, x, config) - x.sin()).powi(2)
            })
            .sum(),
    }
}

/// Human-readable expression built by the same left-to-right walk.
///
/// Never fails: with an empty table only the starting symbol is returned.
pub fn decode_expression(genes: &[usize], config: &EAConfig) -> String {
    let mut expr = match config.gp_problem {
        GpProblem::Linear => "50".to_string(),
        GpProblem::Sine => "x".to_string(),
    };
    for &gene in genes {
        let Some(op) = gp_operation(gene, config) else {
            break;
        };
        expr = match op {
            GpOpKind::Add1 => format!("{expr} + 1"),
            GpOpKind::Sub1 => format!("{expr} - 1"),
            GpOpKind::Sub10 => format!("{expr} - 10"),
            GpOpKind::Div2 => format!("({expr}) / 2"),
            GpOpKind::Mul2 => format!("({expr}) * 2"),
            GpOpKind::AddX => format!("{expr} + x"),
            GpOpKind::Sin => format!("sin({expr})"),
            GpOpKind::Cos => format!("cos({expr})"),
            GpOpKind::AddConst => format!("{expr} + 5"),
            GpOpKind::Nop => expr,
        };
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GpOperation;
    use proptest::prelude::*;

    fn items() -> Vec<KnapsackItem> {
        [(2.0, 3.0), (3.0, 4.0), (4.0, 5.0)]
            .into_iter()
            .map(|(weight, value)| KnapsackItem { weight, value })
            .collect()
    }

    fn gp_config(problem: GpProblem, kinds: &[GpOpKind]) -> EAConfig {
        EAConfig {
            gp_problem: problem,
            gp_operations: kinds.iter().map(|&k| GpOperation::new(k)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sphere_values() {
        let values: Vec<f64> = [[1.0, 1.0], [2.0, 2.0], [-1.0, -1.0], [0.0, 0.0]]
            .iter()
            .map(|g| sphere(g))
            .collect();
        assert_eq!(values, vec![2.0, 8.0, 2.0, 0.0]);
    }

    #[test]
    fn test_ackley_origin() {
        assert!(ackley(&[0.0, 0.0]).abs() < 1e-12);
        assert!(ackley(&[1.0, 1.0]) > 0.0);
    }

    #[test]
    fn test_knapsack_at_capacity_is_valid() {
        let eval = knapsack(&[1, 1, 0], &items(), 5.0);
        assert_eq!(eval.weight, 5.0);
        assert!(eval.is_valid);
        assert_eq!(eval.fitness, 7.0);
    }

    #[test]
    fn test_knapsack_overweight_scores_zero() {
        let eval = knapsack(&[1, 1, 1], &items(), 5.0);
        assert_eq!(eval.weight, 9.0);
        assert!(!eval.is_valid);
        assert_eq!(eval.fitness, 0.0);
    }

    #[test]
    fn test_gp_linear_scenario() {
        let config = gp_config(GpProblem::Linear, &[GpOpKind::Add1, GpOpKind::Sub10]);
        assert_eq!(evaluate_gp(&[0, 0, 1], 0.0, &config), 42.0);
        assert_eq!(gp_fitness(&[0, 0, 1], &config), 42.0);
        assert_eq!(decode_expression(&[0, 0, 1], &config), "50 + 1 + 1 - 10");
    }

    #[test]
    fn test_gp_gene_wraps_around_table() {
        let config = gp_config(GpProblem::Linear, &[GpOpKind::Add1, GpOpKind::Sub10]);
        // 3 % 2 == 1 -> SUB_10
        assert_eq!(evaluate_gp(&[3], 0.0, &config), 40.0);
    }

    #[test]
    fn test_gp_div_floors() {
        let config = gp_config(GpProblem::Linear, &[GpOpKind::Sub1, GpOpKind::Div2]);
        // 50 - 1 = 49, floor(49 / 2) = 24
        assert_eq!(evaluate_gp(&[0, 1], 0.0, &config), 24.0);
        assert_eq!(decode_expression(&[0, 1], &config), "(50 - 1) / 2");
    }

    #[test]
    fn test_gp_sine_exact_fit() {
        let config = gp_config(GpProblem::Sine, &[GpOpKind::Sin]);
        assert!(gp_fitness(&[0], &config) < 1e-20);
        assert_eq!(decode_expression(&[0, 0], &config), "sin(sin(x))");
    }

    #[test]
    fn test_gp_empty_table() {
        let config = gp_config(GpProblem::Linear, &[]);
        assert_eq!(evaluate_gp(&[0, 1, 2], 0.0, &config), 50.0);
        assert_eq!(decode_expression(&[0, 1, 2], &config), "50");
    }

    proptest! {
        #[test]
        fn prop_knapsack_feasibility(genes in proptest::collection::vec(0u8..=1, 3)) {
            let items = items();
            let eval = knapsack(&genes, &items, 5.0);
            let weight: f64 = genes.iter().zip(&items).filter(|(g, _)| **g == 1).map(|(_, i)| i.weight).sum();
            let value: f64 = genes.iter().zip(&items).filter(|(g, _)| **g == 1).map(|(_, i)| i.value).sum();
            prop_assert!(eval.weight >= 0.0);
            prop_assert_eq!(eval.weight, weight);
            if weight > 5.0 {
                prop_assert_eq!(eval.fitness, 0.0);
            } else {
                prop_assert_eq!(eval.fitness, value);
            }
        }

        #[test]
        fn prop_gp_any_gene_is_in_range(genes in proptest::collection::vec(any::<usize>(), 0..8), len in 1usize..10) {
            let config = gp_config(GpProblem::Sine, &GpOpKind::ALL[..len]);
            for &gene in &genes {
                prop_assert!(gp_operation(gene, &config).is_some());
            }
            let _ = gp_fitness(&genes, &config);
            let _ = decode_expression(&genes, &config);
        }
    }
}
