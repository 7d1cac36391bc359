mod event_flow_tests;
mod startup_tests;
