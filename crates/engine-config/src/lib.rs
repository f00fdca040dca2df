pub mod env;

pub mod settings {
    pub mod error;
    pub mod scan;
}
