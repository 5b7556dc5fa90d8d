mod apply_failure_test;
mod reconcile_test;
