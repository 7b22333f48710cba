use crate::UNKNOWN_STATION;
use crate::model::RouteStops;

/// Next named stop of a vehicle that last passed `last`.
///
/// Falls back to [`UNKNOWN_STATION`] when `last` is not on the route.
pub fn heading_station(route: &RouteStops, reversed: bool, last: &str, vehicle_end: &str) -> String {
    let directed = route.directed(reversed);

    let next = if last == directed.start {
        directed.via.first().copied().unwrap_or(directed.end)
    } else if last == directed.end {
        directed.via.last().copied().unwrap_or(directed.start)
    } else {
        match directed.via.iter().position(|stop| *stop == last) {
            Some(i) => directed.via.get(i + 1).copied().unwrap_or(vehicle_end),
            None => UNKNOWN_STATION,
        }
    };

    next.to_string()
}
