// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Members & Centers ---
        handlers::members::list_members,
        handlers::members::list_centers,

        // --- Scheduling (turnos, vínculos, vagas) ---
        handlers::scheduling::create_work_shifts_bulk,
        handlers::scheduling::list_work_shifts,
        handlers::scheduling::delete_work_shift,
        handlers::scheduling::assign_member_to_shifts,
        handlers::scheduling::assign_cohort,
        handlers::scheduling::list_assignments_by_member,
        handlers::scheduling::retarget_assignment,
        handlers::scheduling::delete_assignment,
        handlers::scheduling::generate_slots,
        handlers::scheduling::list_slots,

        // --- Wizard ---
        handlers::wizard::open_wizard,
        handlers::wizard::get_wizard,
        handlers::wizard::submit_shifts,
        handlers::wizard::submit_assignments,
        handlers::wizard::submit_slots,
        handlers::wizard::back,
        handlers::wizard::cancel,

        // --- Scheduler (quadro interativo) ---
        handlers::scheduler::open_board,
        handlers::scheduler::list_events,
        handlers::scheduler::create_event,
        handlers::scheduler::resize_event,
        handlers::scheduler::move_event,
        handlers::scheduler::change_event_status,
        handlers::scheduler::close_board,

        // --- Calendar ---
        handlers::calendar::month_view,
        handlers::calendar::attendance,
    ),
    components(
        schemas(
            // --- Scheduling ---
            models::scheduling::MemberRole,
            models::scheduling::ShiftStatus,
            models::scheduling::Center,
            models::scheduling::Member,
            models::scheduling::WorkShift,
            models::scheduling::ShiftAssignment,
            models::scheduling::Slot,
            models::scheduling::SlotGenerationSummary,
            models::scheduling::MemberAssignmentOutcome,

            // --- Scheduler ---
            models::scheduler::EventStatus,
            models::scheduler::ScheduledEvent,

            // --- Calendar ---
            models::calendar::ShiftPeriod,
            models::calendar::CalendarAssignmentEntry,
            models::calendar::CalendarDay,
            models::calendar::CalendarMonthView,
            models::calendar::AttendanceEntry,

            // --- Wizard ---
            services::wizard_service::WizardSnapshot,
            services::wizard_service::AssignmentStageResult,

            // --- Payloads ---
            handlers::scheduling::CreateShiftsBulkPayload,
            handlers::scheduling::AssignMemberPayload,
            handlers::scheduling::AssignmentCreatedResponse,
            handlers::scheduling::AssignCohortPayload,
            handlers::scheduling::RetargetAssignmentPayload,
            handlers::scheduling::GenerateSlotsPayload,
            handlers::wizard::WizardShiftsPayload,
            handlers::wizard::WizardAssignmentsPayload,
            handlers::wizard::WizardSlotsPayload,
            handlers::scheduler::OpenBoardPayload,
            handlers::scheduler::BoardOpened,
            handlers::scheduler::CreateEventPayload,
            handlers::scheduler::ResizeEventPayload,
            handlers::scheduler::MoveEventPayload,
            handlers::scheduler::ChangeStatusPayload,
        )
    ),
    tags(
        (name = "Members", description = "Cadastros lidos pelo módulo (pessoal e centros)"),
        (name = "Scheduling", description = "Turnos, vínculos e geração de vagas"),
        (name = "Wizard", description = "Assistente de provisionamento em 4 estágios"),
        (name = "Scheduler", description = "Quadro interativo da agenda dos técnicos"),
        (name = "Calendar", description = "Grade mensal e gráfico de presença")
    )
)]
pub struct ApiDoc;
