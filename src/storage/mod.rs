pub mod keychain;
pub mod settings_io;
pub mod streak;
