pub mod mock_adc;
pub mod mock_constants;
pub mod mock_motor_driver;
