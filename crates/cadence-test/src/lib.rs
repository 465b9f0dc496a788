//! Cadence tracker - integration test support.
//!
//! Re-exports the workspace crates under one path for the integration tests.

pub mod component {
    pub use cadence_core::{config, types, util};
    pub use cadence_service::{dashboard, goal, habit, journal, task};

    pub mod db {
        pub use cadence_db::db::*;
    }

    pub mod model {
        pub use cadence_db::model::*;
    }

    pub mod error {
        pub use cadence_core::error::{CoreError, CoreResult};
        pub use cadence_db::error::{DbError, DbResult};
        pub use cadence_service::error::{ServiceError, ServiceResult};
    }
}
