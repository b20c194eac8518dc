pub mod assessment;
pub mod place;
pub mod restaurant;
pub mod review;
