//! Cross-module tests exercising groups, controllers and domains together

mod scenarios;
