use genenet_core::CorrelationMatrix;
use genenet_test_support::fixtures::TableFixture;

#[must_use]
pub fn matrix(fixture: TableFixture) -> CorrelationMatrix {
    CorrelationMatrix::try_new(fixture.name, fixture.genes, fixture.values)
        .expect("fixture must form a square matrix")
}
