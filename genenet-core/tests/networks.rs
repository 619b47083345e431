//! Network construction, sweeps and their structural properties.
mod common;

use genenet_core::{
    AdjacencyMatrix, CorrelationMatrix, Graph, PowerLawOutcome, Thresholds, fit_power_law,
    threshold_sweep,
};
use genenet_test_support::fixtures::{block_rna, block_tec, four_gene_rna, four_gene_tec};
use proptest::{collection::vec, prelude::*};
use rstest::rstest;

use common::matrix;

#[rstest]
fn four_gene_fixture_has_two_edges_and_two_components() {
    let graph = Graph::at_threshold(&matrix(four_gene_tec()), 0.75);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.connected_components(), 2);
    assert_eq!(graph.degrees(), vec![1, 1, 1, 1]);
    assert_eq!(graph.average_clustering(), 0.0);
}

#[rstest]
#[case(0.95, 0, 0)]
#[case(0.86, 1, 2)]
#[case(0.75, 2, 4)]
#[case(0.19, 3, 4)]
fn four_gene_sweep_counts(#[case] threshold: f32, #[case] edges: usize, #[case] connected: usize) {
    let thresholds = Thresholds::try_new("sweep", vec![threshold]).expect("single threshold");
    let sweep = threshold_sweep(&matrix(four_gene_tec()), &matrix(four_gene_rna()), &thresholds)
        .expect("shapes match");
    let record = sweep.records()[0];
    assert_eq!(record.tec.edges, edges);
    assert_eq!(record.tec.connected_nodes, connected);
    assert_eq!(record.tec.isolated_nodes, 4 - connected);
}

#[rstest]
fn sweep_preserves_configured_order() {
    let thresholds = Thresholds::try_new("sweep", vec![0.5, 0.75, 0.9]).expect("ascending");
    let sweep =
        threshold_sweep(&matrix(block_tec()), &matrix(block_rna()), &thresholds).expect("sweep");
    assert_eq!(sweep.thresholds(), vec![0.5, 0.75, 0.9]);
    assert_eq!(sweep.series(|r| r.tec.edges), vec![17, 17, 0]);
    assert_eq!(sweep.series(|r| r.rna.edges), vec![17, 16, 0]);
    assert_eq!(sweep.series(|r| r.rna.components), vec![4, 5, 12]);
}

#[rstest]
fn block_network_supports_a_power_law_fit() {
    let graph = Graph::at_threshold(&matrix(block_tec()), 0.75);
    let PowerLawOutcome::Fitted(fit) = fit_power_law(&graph.degrees()) else {
        panic!("three distinct degrees must fit");
    };
    let degrees: Vec<usize> = fit.points.iter().map(|p| p.degree).collect();
    assert_eq!(degrees, vec![1, 3, 4]);
    assert!(fit.alpha.is_finite());
    assert!(fit.r_squared.is_some());
}

fn symmetric_matrix() -> impl Strategy<Value = CorrelationMatrix> {
    (1_usize..8).prop_flat_map(|size| {
        vec(-1.0_f32..=1.0, size * size).prop_map(move |raw| {
            let mut values = raw;
            for row in 0..size {
                for column in 0..row {
                    values[row * size + column] = values[column * size + row];
                }
            }
            let genes = (0..size).map(|index| format!("g{index}")).collect();
            CorrelationMatrix::try_new("prop", genes, values).expect("square by construction")
        })
    })
}

proptest! {
    #[test]
    fn adjacency_is_symmetric_with_zero_diagonal(
        matrix in symmetric_matrix(),
        threshold in -0.2_f32..1.1,
    ) {
        let adjacency = AdjacencyMatrix::from_threshold(&matrix, threshold);
        prop_assert!(adjacency.is_symmetric());
        for index in 0..adjacency.size() {
            prop_assert_eq!(adjacency.get(index, index), 0);
        }
    }

    #[test]
    fn diagonal_is_ignored_even_when_asymmetric(
        size in 1_usize..6,
        raw in vec(-2.0_f32..=2.0, 36),
    ) {
        let values: Vec<f32> = raw.into_iter().take(size * size).collect();
        let genes = (0..size).map(|index| format!("g{index}")).collect();
        let matrix = CorrelationMatrix::try_new("prop", genes, values).expect("square");
        let adjacency = AdjacencyMatrix::from_threshold(&matrix, -1.0);
        for index in 0..size {
            prop_assert_eq!(adjacency.get(index, index), 0);
        }
    }

    #[test]
    fn edge_count_never_grows_with_threshold(
        matrix in symmetric_matrix(),
        low in 0.0_f32..1.0,
        delta in 0.0_f32..0.5,
    ) {
        let high = low + delta;
        let sparse = Graph::at_threshold(&matrix, high);
        let dense = Graph::at_threshold(&matrix, low);
        prop_assert!(sparse.edge_count() <= dense.edge_count());
        prop_assert_eq!(
            AdjacencyMatrix::from_threshold(&matrix, low).upper_triangle_sum(),
            dense.edge_count()
        );
    }
}
