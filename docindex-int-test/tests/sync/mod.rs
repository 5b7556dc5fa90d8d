mod deadline_test;
mod index_sync_test;
