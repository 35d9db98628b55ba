//! Scenario tests for the pool against the reference scene host

mod support;
