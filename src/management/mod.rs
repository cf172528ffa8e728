mod collector;

pub use collector::UserDataCollector;
