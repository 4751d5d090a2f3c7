//! Game variables shared between client and server
//!
//! Tunables such as tank speed or shot range live in a [`VariableDatabase`]
//! rather than in constants so a server (or the local config file) can
//! override them. Lookups are case-insensitive; names keep the case they were
//! registered with.

use std::collections::BTreeMap;
use std::fmt;

use tank_engine::foundation::math::constants::HALF_PI;

/// Names of the built-in variables
pub mod names {
    /// Time (in seconds) to respawn after being killed
    pub const EXPLODE_TIME: &str = "explodeTime";
    /// How close a tank must be to a flag to pick it up
    pub const FLAG_RADIUS: &str = "flagRadius";
    /// Time (in seconds) between shot reloads
    pub const RELOAD_TIME: &str = "reloadTime";
    /// Distance a shot travels before it ends
    pub const SHOT_RANGE: &str = "shotRange";
    /// Half the side of a shot's collision square
    pub const SHOT_RADIUS: &str = "shotRadius";
    /// Number of shots a tank may have in flight
    pub const SHOT_SLOTS: &str = "shotSlots";
    /// Speed of shots
    pub const SHOT_SPEED: &str = "shotSpeed";
    /// Angular speed (radians/sec) of the tank
    pub const TANK_ANG_VEL: &str = "tankAngVel";
    /// Length of the tank
    pub const TANK_LENGTH: &str = "tankLength";
    /// Speed of the tank
    pub const TANK_SPEED: &str = "tankSpeed";
    /// Width of the tank
    pub const TANK_WIDTH: &str = "tankWidth";
    /// Position updates sent to the server per second
    pub const UPDATES_PER_SECOND: &str = "updatesPerSecond";
}

/// Type of a variable's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// 32-bit float
    Float,
    /// Unsigned 16-bit integer
    UInt,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::UInt => write!(f, "unsigned integer"),
        }
    }
}

/// A typed variable value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableValue {
    /// Floating point value
    Float(f32),
    /// Unsigned integer value
    UInt(u16),
}

impl VariableValue {
    /// Type of this value
    pub const fn kind(&self) -> VariableKind {
        match self {
            Self::Float(_) => VariableKind::Float,
            Self::UInt(_) => VariableKind::UInt,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
        }
    }
}

impl From<f32> for VariableValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<u16> for VariableValue {
    fn from(value: u16) -> Self {
        Self::UInt(value)
    }
}

/// Variable database errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VariableError {
    /// No variable with that name
    #[error("unknown variable '{0}'")]
    Unknown(String),

    /// A variable with that name already exists
    #[error("variable '{0}' already exists")]
    Duplicate(String),

    /// The value has the wrong type for the variable
    #[error("variable '{name}' holds a {expected}, got a {found}")]
    TypeMismatch {
        /// Variable name
        name: String,
        /// Type the variable holds
        expected: VariableKind,
        /// Type that was supplied
        found: VariableKind,
    },

    /// The value cannot be represented in the variable's type
    #[error("value {value} is out of range for variable '{name}'")]
    OutOfRange {
        /// Variable name
        name: String,
        /// Rejected value
        value: f64,
    },
}

/// One named variable with a default and an optional override
#[derive(Debug, Clone, PartialEq)]
pub struct VariableStore {
    name: String,
    description: String,
    default: VariableValue,
    value: Option<VariableValue>,
}

impl VariableStore {
    fn new(name: &str, description: &str, default: VariableValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            default,
            value: None,
        }
    }

    /// Name as registered
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Type of the variable
    pub const fn kind(&self) -> VariableKind {
        self.default.kind()
    }

    /// Default value
    pub const fn default_value(&self) -> VariableValue {
        self.default
    }

    /// Current value, the override if one is set
    pub fn value(&self) -> VariableValue {
        self.value.unwrap_or(self.default)
    }

    /// Whether an override differing from the default is in effect
    pub fn changed(&self) -> bool {
        self.value.is_some_and(|value| value != self.default)
    }

    /// Drop the override
    pub fn reset(&mut self) {
        self.value = None;
    }
}

/// Case-insensitive store of typed game variables
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDatabase {
    variables: BTreeMap<String, VariableStore>,
}

impl Default for VariableDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableDatabase {
    /// Creates a database holding the built-in variables at their defaults
    pub fn new() -> Self {
        let mut database = Self::empty();
        database.add_default_variables();
        database
    }

    /// Creates a database without any variables
    pub const fn empty() -> Self {
        Self {
            variables: BTreeMap::new(),
        }
    }

    fn add_default_variables(&mut self) {
        let defaults: [(&str, &str, VariableValue); 12] = [
            (names::EXPLODE_TIME, "Time (in seconds) to respawn after being killed", 5.0_f32.into()),
            (names::FLAG_RADIUS, "Determines how close a tank must be to a flag to pick it up", 2.5_f32.into()),
            (names::RELOAD_TIME, "Time (in seconds) between shot reloads", 3.5_f32.into()),
            (names::SHOT_RANGE, "Range of shots", 350.0_f32.into()),
            (names::SHOT_RADIUS, "Collision radius of shots", 0.5_f32.into()),
            (names::SHOT_SLOTS, "Number of shot slots", 5_u16.into()),
            (names::SHOT_SPEED, "Speed of shots", 100.0_f32.into()),
            (names::TANK_ANG_VEL, "Angular speed (radians/sec) of the tank", HALF_PI.into()),
            (names::TANK_LENGTH, "Length of the tank", 6.0_f32.into()),
            (names::TANK_SPEED, "Speed of the tank", 25.0_f32.into()),
            (names::TANK_WIDTH, "Width of the tank", 4.86_f32.into()),
            (names::UPDATES_PER_SECOND, "Position updates sent to the server per second", 10_u16.into()),
        ];

        for (name, description, default) in defaults {
            self.variables
                .insert(name.to_lowercase(), VariableStore::new(name, description, default));
        }
    }

    /// Register a new variable
    ///
    /// # Errors
    ///
    /// Fails if a variable with the same name (ignoring case) exists.
    pub fn add_variable(
        &mut self,
        name: &str,
        description: &str,
        default: impl Into<VariableValue>,
    ) -> Result<&VariableStore, VariableError> {
        let key = name.to_lowercase();
        if self.variables.contains_key(&key) {
            return Err(VariableError::Duplicate(name.to_string()));
        }
        Ok(self
            .variables
            .entry(key)
            .or_insert_with(|| VariableStore::new(name, description, default.into())))
    }

    /// Look up a variable
    ///
    /// # Errors
    ///
    /// Fails if no such variable exists.
    pub fn get(&self, name: &str) -> Result<&VariableStore, VariableError> {
        self.variables
            .get(&name.to_lowercase())
            .ok_or_else(|| VariableError::Unknown(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut VariableStore, VariableError> {
        self.variables
            .get_mut(&name.to_lowercase())
            .ok_or_else(|| VariableError::Unknown(name.to_string()))
    }

    /// Override a variable
    ///
    /// # Errors
    ///
    /// Fails for unknown names and values of the wrong type.
    pub fn set(&mut self, name: &str, value: impl Into<VariableValue>) -> Result<(), VariableError> {
        let value = value.into();
        let variable = self.get_mut(name)?;
        if variable.kind() != value.kind() {
            return Err(VariableError::TypeMismatch {
                name: variable.name.clone(),
                expected: variable.kind(),
                found: value.kind(),
            });
        }

        log::debug!("Variable {} set to {}", variable.name, value);
        variable.value = Some(value);
        Ok(())
    }

    /// Override a variable from an untyped number, converting it to the
    /// variable's type
    ///
    /// # Errors
    ///
    /// Fails for unknown names and for numbers the variable's type cannot hold
    /// (fractions or negatives for integer variables, floats that are not
    /// finite or do not fit in `f32`).
    pub fn set_from_f64(&mut self, name: &str, number: f64) -> Result<(), VariableError> {
        let kind = self.get(name)?.kind();
        let out_of_range = || VariableError::OutOfRange {
            name: name.to_string(),
            value: number,
        };

        let value = match kind {
            VariableKind::Float => {
                if !number.is_finite() || number.abs() > f64::from(f32::MAX) {
                    return Err(out_of_range());
                }
                VariableValue::Float(number as f32)
            }
            VariableKind::UInt => {
                if number.fract() != 0.0 || !(0.0..=f64::from(u16::MAX)).contains(&number) {
                    return Err(out_of_range());
                }
                VariableValue::UInt(number as u16)
            }
        };
        self.set(name, value)
    }

    /// Current value of a float variable
    ///
    /// # Errors
    ///
    /// Fails for unknown names and non-float variables.
    pub fn float(&self, name: &str) -> Result<f32, VariableError> {
        let variable = self.get(name)?;
        match variable.value() {
            VariableValue::Float(value) => Ok(value),
            other => Err(VariableError::TypeMismatch {
                name: variable.name.clone(),
                expected: VariableKind::Float,
                found: other.kind(),
            }),
        }
    }

    /// Current value of an integer variable
    ///
    /// # Errors
    ///
    /// Fails for unknown names and non-integer variables.
    pub fn uint(&self, name: &str) -> Result<u16, VariableError> {
        let variable = self.get(name)?;
        match variable.value() {
            VariableValue::UInt(value) => Ok(value),
            other => Err(VariableError::TypeMismatch {
                name: variable.name.clone(),
                expected: VariableKind::UInt,
                found: other.kind(),
            }),
        }
    }

    /// Variables currently overridden to a non-default value
    pub fn changed(&self) -> Vec<&VariableStore> {
        self.variables.values().filter(|variable| variable.changed()).collect()
    }

    /// All variables, ordered by lowercase name
    pub fn iter(&self) -> impl Iterator<Item = &VariableStore> {
        self.variables.values()
    }

    /// Reset one variable to its default
    ///
    /// # Errors
    ///
    /// Fails for unknown names.
    pub fn reset_variable(&mut self, name: &str) -> Result<(), VariableError> {
        self.get_mut(name)?.reset();
        Ok(())
    }

    /// Reset several variables; stops at the first unknown name
    ///
    /// # Errors
    ///
    /// Fails for unknown names.
    pub fn reset_variables<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), VariableError> {
        for name in names {
            self.reset_variable(name)?;
        }
        Ok(())
    }

    /// Reset every variable to its default
    pub fn reset_all(&mut self) {
        for variable in self.variables.values_mut() {
            variable.reset();
        }
    }
}

/// Tank and shot tunables read from a [`VariableDatabase`] once per use site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankTunables {
    /// Forward speed in world units per second
    pub tank_speed: f32,
    /// Turning speed in radians per second
    pub tank_angular_velocity: f32,
    /// Tank length (along its heading)
    pub tank_length: f32,
    /// Tank width
    pub tank_width: f32,
    /// Shot speed in world units per second
    pub shot_speed: f32,
    /// Distance a shot may travel
    pub shot_range: f32,
    /// Half the side of a shot's collision square
    pub shot_radius: f32,
    /// Number of shots a tank may have in flight
    pub shot_slots: u16,
    /// Position updates per second sent to the server
    pub updates_per_second: u16,
}

impl TankTunables {
    /// Read the tunables from `variables`
    ///
    /// # Errors
    ///
    /// Fails if a built-in variable is missing or has the wrong type.
    pub fn from_variables(variables: &VariableDatabase) -> Result<Self, VariableError> {
        Ok(Self {
            tank_speed: variables.float(names::TANK_SPEED)?,
            tank_angular_velocity: variables.float(names::TANK_ANG_VEL)?,
            tank_length: variables.float(names::TANK_LENGTH)?,
            tank_width: variables.float(names::TANK_WIDTH)?,
            shot_speed: variables.float(names::SHOT_SPEED)?,
            shot_range: variables.float(names::SHOT_RANGE)?,
            shot_radius: variables.float(names::SHOT_RADIUS)?,
            shot_slots: variables.uint(names::SHOT_SLOTS)?,
            updates_per_second: variables.uint(names::UPDATES_PER_SECOND)?,
        })
    }
}

impl Default for TankTunables {
    fn default() -> Self {
        Self {
            tank_speed: 25.0,
            tank_angular_velocity: HALF_PI,
            tank_length: 6.0,
            tank_width: 4.86,
            shot_speed: 100.0,
            shot_range: 350.0,
            shot_radius: 0.5,
            shot_slots: 5,
            updates_per_second: 10,
        }
    }
}
