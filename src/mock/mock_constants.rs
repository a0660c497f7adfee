// Readings of the simulated muscle sensors. An active muscle reads below the
// default threshold (100) and a relaxed one reads above it.
pub const SIMULATION_READING_ACTIVE: i32 = 50;
pub const SIMULATION_READING_RELAXED: i32 = 600;

// Ticks of each phase of the simulated movement (flex, extend, rest).
pub const SIMULATION_TICKS_PER_PHASE: usize = 20;

// Step of the simulated speed potentiometer that ramps over the ADC range.
pub const SIMULATION_SPEED_STEP: i32 = 64;
