pub mod cbr;

pub use cbr::CbrProvider;
