use crate::models::shipment::ShipmentStatus;

/// The legal status graph. Forward path plus the failed-attempt retry
/// loop; cancellation only out of Booked; Delivered and Cancelled are
/// terminal.
pub fn is_legal(from: ShipmentStatus, to: ShipmentStatus) -> bool {
    use ShipmentStatus::*;

    matches!(
        (from, to),
        (Booked, InTransit)
            | (InTransit, OutForDelivery)
            | (OutForDelivery, Delivered)
            | (OutForDelivery, FailedAttempt)
            | (FailedAttempt, OutForDelivery)
            | (Booked, Cancelled)
    )
}
