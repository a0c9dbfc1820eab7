mod chain_tests;
mod integration_tests;
mod plan_tests;
mod property_tests;
mod validation_tests;
