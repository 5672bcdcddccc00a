//! Physical constants of light propagation in ice.
//! Lengths are in m, times in ns.

/// Speed of light in vacuum, units of m/ns
pub const C_VACUUM: f64 = 0.299792458;
/// Phase refractive index of ice
pub const PHASE_INDEX: f64 = 1.3195;
/// Group refractive index of ice
pub const GROUP_INDEX: f64 = 1.35634;
/// Speed at which a photon wave packet travels through ice, units of m/ns
pub const C_ICE_GROUP: f64 = C_VACUUM / GROUP_INDEX;
/// Cherenkov angle, acos(1/n_phase), units of rad
pub const CHERENKOV_ANGLE: f64 = 0.7107652674220083;
/// sin of the Cherenkov angle
pub const SIN_CHERENKOV: f64 = 0.6524139297346058;
/// tan of the Cherenkov angle
pub const TAN_CHERENKOV: f64 = 0.8608601802848123;
/// n_group / sin(theta_c) - 1 / tan(theta_c): converts a perpendicular
/// distance into the extra path a Cherenkov photon travels, in units of
/// vacuum light-time
pub const EFF_TAN_CHERENKOV: f64 = 0.9173273989031925;
