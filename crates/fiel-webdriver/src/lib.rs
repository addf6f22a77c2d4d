pub mod capabilities;
pub mod webdriver;

pub use capabilities::chrome_capabilities;
pub use webdriver::WebDriverSession;
