// This file is part of run_arm_controller.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Arm Controller
//!
//! This library drives the joint of a mechanical arm from the activity of two
//! muscles. A sampler reads the muscle sensors and the speed potentiometer,
//! and an actuator applies the bang-bang control to the H-bridge of the
//! motor.
pub mod application;
pub mod config;
pub mod constants;
pub mod control;
pub mod device;
pub mod enums;
pub mod error;
pub mod measurement;
pub mod mock;
pub mod model;
pub mod utility;
