use num_traits::Float;

/// reduce an angle into [0, period)
pub fn revolve<T: Float>(angle: T, period: T) -> T {
    let reduced = angle % period;
    let reduced = if reduced < T::zero() {
        reduced + period
    } else {
        reduced
    };
    // -1e-20 % 360 + 360 rounds up to exactly 360
    if reduced >= period {
        T::zero()
    } else {
        reduced
    }
}

/// reduce an angle in degrees into [0, 360)
pub fn rev<T: Float>(degrees: T) -> T {
    revolve(degrees, full_turn())
}

/// reduce an angle in hours into [0, 24)
pub fn rev_hours<T: Float>(hours: T) -> T {
    revolve(hours, T::from(24.0).unwrap_or_else(T::one))
}

/// reduce an angle in degrees into [-180, 180)
pub fn rev180<T: Float>(degrees: T) -> T {
    let half = full_turn::<T>() / (T::one() + T::one());
    rev(degrees + half) - half
}

fn full_turn<T: Float>() -> T {
    T::from(360.0).unwrap_or_else(T::one)
}
