mod cache_tests;
mod predictor_tests;
mod tests;
