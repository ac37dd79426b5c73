pub mod constants;
pub mod fixtures;
pub mod svm_ledger;
pub mod test_vm;
