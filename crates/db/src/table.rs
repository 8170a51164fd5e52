use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Social {
    Table,
    Id,
    HostId,
    VenueId,
    StartAt,
    EndAt,
    Fee,
    SkillLevel,
    DemandFemale,
    DemandMale,
    CurrentFemale,
    CurrentMale,
    Note,
    IsCancelled,
    QrCodeGenerated,
    ReminderSent,
    AttendanceFinalized,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum SocialWaitlist {
    Table,
    Seq,
    SocialId,
    PlayerId,
    Gender,
    JoinedAt,
}

#[derive(Iden, Clone)]
pub enum SocialParticipant {
    Table,
    Id,
    SocialId,
    PlayerId,
    Gender,
    Status,
    RegisteredAt,
    CancelledAt,
    CheckedIn,
    CheckedInAt,
    IsOverridden,
    OverriddenAt,
    Note,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Player {
    Table,
    Id,
    Gender,
    Name,
    Email,
    LineUid,
    Role,
    AttendedCount,
    ResolvedCount,
    AttendanceRate,
    CreatedAt,
}
