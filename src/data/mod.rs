//! Validated input containers: design matrices, count responses and
//! grouped choice data.
pub mod design;
pub mod errors;
pub mod response;

pub use design::{ColumnRoles, DesignMatrix};
pub use errors::{DataError, DataResult};
pub use response::{ChoiceData, ChoiceDataset, ChoiceSet, CountData, CountResponse};
