pub mod gemini;
pub mod google_places;
pub mod restaurants;
