mod relay_tests;
mod support;
