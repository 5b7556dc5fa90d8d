mod indexed_record_derive_test;
