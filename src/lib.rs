pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod file_receipt_datasource;
        pub(crate) mod relay_server_datasource;
        pub(crate) mod verify_receipt_datasource;
        mod utils;
    }
    pub(crate) mod models {
        pub(crate) mod relay_api {
            pub(crate) mod relay_request_model;
            pub(crate) mod relay_response_model;
        }
        pub(crate) mod verify_receipt_api {
            pub(crate) mod verify_receipt_request_model;
            pub(crate) mod verify_receipt_response_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod issuer_repository_impl;
        pub(crate) mod relay_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod entitlement_set;
        pub mod issuer_status;
        pub mod receipt;
        pub mod relay_response;
        pub mod verification_environment;
        pub mod verification_response;
    }
    pub mod repositories {
        pub mod issuer_repository;
        pub mod receipt_source;
        pub mod relay_repository;
    }
    pub mod services {
        pub mod entitlement_resolver;
    }
}

pub mod config;
pub mod constants;
pub mod errors;
pub mod relay;
pub mod util;

pub use data::datasources::file_receipt_datasource::FileReceiptSource;
