pub mod generate;
pub mod inquiry;
