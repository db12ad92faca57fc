mod dataloader_tests;
mod filter_tests;
mod naming_tests;
mod prepare_tests;
mod relation_tests;
mod runtime_directive_tests;
mod type_ref_tests;
mod utils;
mod validator_tests;
