//! Coverage facts: model, translation from reports and publication

pub mod model;
pub mod publish;
pub mod translate;

pub use model::{
    Fact, FactSpec, Measurement, ObjectMeta, Original, ResourceReference, API_VERSION,
    FACT_TYPE_COVERAGE, KIND, MEASUREMENT_COUNT,
};
pub use publish::{FactPublisher, PublishOutcome};
pub use translate::{canonical_type, fact_name, measurements, translate, SUBJECT_KIND};
