//! Well-known DP codes.

pub const CHILD_LOCK: &str = "child_lock";
pub const CLEANING: &str = "cleaning";
pub const CONTROL: &str = "control";
pub const CONTROL_BACK_MODE: &str = "control_back_mode";
pub const COUNTDOWN_LEFT: &str = "countdown_left";
pub const CUR_CURRENT: &str = "cur_current";
pub const CUR_POWER: &str = "cur_power";
pub const CUR_VOLTAGE: &str = "cur_voltage";
pub const DRYING: &str = "drying";
pub const ECO: &str = "eco";
pub const FAN_SPEED_ENUM: &str = "fan_speed_enum";
pub const FAULT: &str = "fault";
pub const HEALTH: &str = "health";
pub const HEAT: &str = "heat";
pub const HUMIDITY: &str = "humidity";
pub const LIGHT: &str = "light";
pub const LOWER_TEMP: &str = "lower_temp";
pub const LOWER_TEMP_F: &str = "lower_temp_f";
pub const MODE: &str = "mode";
pub const PERCENT_CONTROL: &str = "percent_control";
pub const PERCENT_STATE: &str = "percent_state";
pub const SLEEP: &str = "sleep";
pub const SWITCH: &str = "switch";
pub const SWITCH_1: &str = "switch_1";
pub const TEMP_CORRECTION: &str = "temp_correction";
pub const TEMP_CURRENT: &str = "temp_current";
pub const TEMP_CURRENT_F: &str = "temp_current_f";
pub const TEMP_SET: &str = "temp_set";
pub const TEMP_SET_F: &str = "temp_set_f";
pub const TEMP_UNIT_CONVERT: &str = "temp_unit_convert";
pub const TIME_TOTAL: &str = "time_total";
pub const UPPER_TEMP: &str = "upper_temp";
pub const UPPER_TEMP_F: &str = "upper_temp_f";
