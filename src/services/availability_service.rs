use crate::models::{room::Room, search::SearchCriteria};

/// Rooms a search can offer: available, large enough for the party and of
/// the requested type. Input order is kept and the input is left untouched.
pub fn filter_available_rooms(rooms: &[Room], criteria: &SearchCriteria) -> Vec<Room> {
    let guests = criteria.effective_guest_count();

    rooms
        .iter()
        .filter(|room| room.is_available)
        .filter(|room| room.capacity >= guests)
        .filter(|room| criteria.room_type.matches(room.room_type))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::room::RoomType;
    use crate::models::search::RoomTypeFilter;
    use rust_decimal::Decimal;

    fn room(id: i64, capacity: u32, is_available: bool, room_type: RoomType) -> Room {
        Room {
            id,
            room_number: format!("{}", 100 + id),
            room_type,
            price_per_night: Decimal::from(100),
            capacity,
            is_available,
            amenities: String::new(),
            scenery: String::new(),
        }
    }

    fn criteria(guest_count: i32, room_type: RoomTypeFilter) -> SearchCriteria {
        SearchCriteria {
            guest_count,
            room_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_capacity_and_availability() {
        let rooms = vec![
            room(1, 2, true, RoomType::Standard),
            room(2, 4, false, RoomType::Standard),
            room(3, 4, true, RoomType::Standard),
        ];

        let result = filter_available_rooms(&rooms, &criteria(3, RoomTypeFilter::All));
        assert_eq!(result, vec![room(3, 4, true, RoomType::Standard)]);
    }

    #[test]
    fn test_room_type_filter() {
        let rooms = vec![
            room(1, 4, true, RoomType::Suite),
            room(2, 4, true, RoomType::Deluxe),
            room(3, 6, true, RoomType::Suite),
        ];

        let result =
            filter_available_rooms(&rooms, &criteria(2, RoomTypeFilter::Only(RoomType::Suite)));
        let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_non_positive_guest_count_keeps_every_available_room() {
        let rooms = vec![
            room(1, 1, true, RoomType::Standard),
            room(2, 2, true, RoomType::Standard),
            room(3, 2, false, RoomType::Standard),
        ];

        for guests in [0, -1] {
            let result = filter_available_rooms(&rooms, &criteria(guests, RoomTypeFilter::All));
            let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
            assert_eq!(ids, vec![1, 2]);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_available_rooms(&[], &criteria(2, RoomTypeFilter::All)).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent_and_does_not_mutate() {
        let rooms = vec![
            room(4, 3, true, RoomType::Executive),
            room(1, 1, true, RoomType::Standard),
            room(2, 5, true, RoomType::Presidential),
        ];
        let snapshot = rooms.clone();
        let search = criteria(2, RoomTypeFilter::All);

        let first = filter_available_rooms(&rooms, &search);
        let second = filter_available_rooms(&rooms, &search);

        assert_eq!(first, second);
        assert_eq!(rooms, snapshot);
        let ids: Vec<i64> = first.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2]);
    }
}
