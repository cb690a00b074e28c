//! Evaluateur de contraintes dures. Chaque regle est une fonction pure ;
//! `evaluate_all` les replie dans l'ordre et s'arrete a la premiere qui
//! rejette.

use super::types::TrialState;
use crate::calendar;
use crate::model::{Doctor, DoctorId, RejectTag};
use crate::prefs::ProjectedPrefs;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashMap;

pub struct FilterContext<'a> {
    pub date: NaiveDate,
    pub doctor: &'a Doctor,
    pub state: &'a TrialState,
    pub prefs: &'a ProjectedPrefs,
    pub target_limits: &'a HashMap<DoctorId, u32>,
    pub previous_tail: Option<&'a DoctorId>,
    pub period_start: NaiveDate,
}

/// Replie toutes les regles dures dans l'ordre ; renvoie la premiere
/// violee, le cas echeant.
pub fn evaluate_all(ctx: &FilterContext) -> Option<RejectTag> {
    limit(ctx)
        .or_else(|| unavailable(ctx))
        .or_else(|| rest_after(ctx))
        .or_else(|| rest_before(ctx))
        .or_else(|| pre_leave(ctx))
        .or_else(|| weekly_cap(ctx))
        .or_else(|| saturday_rule(ctx))
}

fn limit(ctx: &FilterContext) -> Option<RejectTag> {
    let target = ctx.target_limits.get(&ctx.doctor.id).copied().unwrap_or(0);
    (ctx.state.total(&ctx.doctor.id) >= target).then_some(RejectTag::Limit)
}

fn unavailable(ctx: &FilterContext) -> Option<RejectTag> {
    ctx.prefs
        .is_unavailable(ctx.date, &ctx.doctor.id)
        .then_some(RejectTag::Unavailable)
}

fn rest_after(ctx: &FilterContext) -> Option<RejectTag> {
    let assigned_prev = if ctx.date == ctx.period_start {
        ctx.previous_tail == Some(&ctx.doctor.id)
    } else {
        ctx.state
            .roster
            .doctor_on(ctx.date - Duration::days(1))
            .is_some_and(|d| d == &ctx.doctor.id)
    };
    assigned_prev.then_some(RejectTag::RestAfter)
}

fn rest_before(ctx: &FilterContext) -> Option<RejectTag> {
    ctx.state
        .roster
        .doctor_on(ctx.date + Duration::days(1))
        .is_some_and(|d| d == &ctx.doctor.id)
        .then_some(RejectTag::RestBefore)
}

fn pre_leave(ctx: &FilterContext) -> Option<RejectTag> {
    ctx.prefs
        .is_scheduled_absence(ctx.date + Duration::days(1), &ctx.doctor.id)
        .then_some(RejectTag::PreLeave)
}

fn weekly_cap(ctx: &FilterContext) -> Option<RejectTag> {
    if !ctx.doctor.no_optout {
        return None;
    }
    let week = calendar::week_key(ctx.date, ctx.period_start);
    (ctx.state.weekly_count(week, &ctx.doctor.id) >= 2).then_some(RejectTag::WeeklyCap)
}

fn saturday_rule(ctx: &FilterContext) -> Option<RejectTag> {
    if !ctx.doctor.saturday_rule || ctx.date.weekday() != Weekday::Mon {
        return None;
    }
    let last_saturday = ctx.date - Duration::days(2);
    ctx.state
        .roster
        .doctor_on(last_saturday)
        .is_some_and(|d| d == &ctx.doctor.id)
        .then_some(RejectTag::SaturdayRule)
}
