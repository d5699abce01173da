//! Built-in routes and the trivia shown alongside them.

use crate::{Route, RouteBuilder, RouteResult};

/// New Delhi → Patna Jn along the Delhi–Kanpur–Prayagraj trunk line.
///
/// Coordinates are station locations rounded to four decimals.
pub fn delhi_patna() -> RouteResult<Route> {
    RouteBuilder::new("Delhi → Patna")
        .stop("New Delhi", 28.6430, 77.2194)
        .stop("Ghaziabad Jn", 28.6476, 77.4282)
        .stop("Aligarh Jn", 27.8879, 78.0700)
        .stop("Tundla Jn", 27.2095, 78.2376)
        .stop("Etawah Jn", 26.7831, 79.0223)
        .stop("Kanpur Central", 26.4540, 80.3506)
        .stop("Prayagraj Jn", 25.4449, 81.8250)
        .stop("Mirzapur", 25.1447, 82.5663)
        .stop("Pt. Deen Dayal Upadhyaya Jn", 25.2785, 83.1199)
        .stop("Buxar", 25.5647, 83.9777)
        .stop("Ara Jn", 25.5606, 84.6635)
        .stop("Danapur", 25.5862, 85.0443)
        .stop("Patna Jn", 25.6027, 85.1375)
        .build()
}

/// Display-only trivia rotated beside the journey panel.
pub const ROUTE_FACTS: &[&str] = &[
    "The Delhi–Kanpur–Prayagraj corridor is one of the oldest trunk lines in India, dating from the 1860s.",
    "Pt. Deen Dayal Upadhyaya Junction was known as Mughalsarai until 2018.",
    "Prayagraj lies close to the confluence of the Ganga and the Yamuna.",
    "Between Ara and Patna the line crosses the Son river on the Koilwar bridge, opened in 1862.",
    "Kanpur Central is one of the busiest junctions on the northern network.",
    "East of Buxar the railway runs a few kilometres south of the Ganga almost all the way to Patna.",
];
