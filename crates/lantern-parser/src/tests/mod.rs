mod parser_error_tests;
mod parser_executable_tests;
mod parser_schema_tests;
mod utils;
mod value_tests;
