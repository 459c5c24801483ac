pub mod center_repo;
pub use center_repo::CenterRepository;
pub mod member_repo;
pub use member_repo::MemberRepository;
pub mod shift_repo;
pub use shift_repo::WorkShiftRepository;
pub mod assignment_repo;
pub use assignment_repo::AssignmentRepository;
pub mod slot_repo;
pub use slot_repo::SlotRepository;
