use crate::model::{
    Appointment, AppointmentStatus, Directory, LeaveRequest, LeaveStatus, Staff, TimeOfDay,
};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de membres depuis CSV: header `handle,display_name[,leaves]`
/// `leaves` : plages `YYYY-MM-DD/YYYY-MM-DD` incluses, séparées par `;` ;
/// une date seule vaut un congé d'un jour. Importées comme approuvées.
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Staff>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        if handle.is_empty() || display.is_empty() {
            bail!("invalid staff row (empty)");
        }
        let mut member = Staff::new(handle.to_string(), display.to_string());
        if let Some(ranges) = rec.get(2) {
            let ranges = ranges.trim();
            if !ranges.is_empty() {
                member.leaves = parse_leaves(ranges)
                    .with_context(|| format!("invalid leaves value for handle {handle}"))?;
            }
        }
        out.push(member);
    }
    Ok(out)
}

fn parse_leaves(raw: &str) -> anyhow::Result<Vec<LeaveRequest>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| parse_leave_chunk(chunk.trim()))
        .collect()
}

fn parse_leave_chunk(chunk: &str) -> anyhow::Result<LeaveRequest> {
    let (start_raw, end_raw) = chunk
        .split_once('/')
        .or_else(|| chunk.split_once(".."))
        .unwrap_or((chunk, chunk));
    let start = parse_date(start_raw.trim())?;
    let end = parse_date(end_raw.trim())?;
    LeaveRequest::new(start, end, LeaveStatus::Approved).map_err(anyhow::Error::msg)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Import de rendez-vous: header `staff_handle,branch,date,start,end[,status]`
/// Les handles et noms de succursale sont résolus contre l'annuaire fourni.
pub fn import_appointments_csv<P: AsRef<Path>>(
    path: P,
    directory: &Directory,
) -> anyhow::Result<Vec<Appointment>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing staff_handle")?.trim();
        let branch_name = rec.get(1).context("missing branch")?.trim();
        let staff = directory
            .find_staff_by_handle(handle)
            .with_context(|| format!("unknown staff handle: {handle}"))?;
        let branch = directory
            .find_branch_by_name(branch_name)
            .with_context(|| format!("unknown branch: {branch_name}"))?;
        let date = parse_date(rec.get(2).context("missing date")?.trim())?;
        let start: TimeOfDay = rec.get(3).context("missing start")?.trim().parse()?;
        let end: TimeOfDay = rec.get(4).context("missing end")?.trim().parse()?;
        let mut appointment =
            Appointment::new(staff.id.clone(), branch.id.clone(), date, start, end)
                .map_err(anyhow::Error::msg)?;
        if let Some(status) = rec.get(5) {
            let status = status.trim();
            if !status.is_empty() {
                appointment.status = parse_status(status)
                    .with_context(|| format!("invalid status for handle {handle}"))?;
            }
        }
        out.push(appointment);
    }
    Ok(out)
}

fn parse_status(s: &str) -> anyhow::Result<AppointmentStatus> {
    match s.to_ascii_lowercase().as_str() {
        "scheduled" => Ok(AppointmentStatus::Scheduled),
        "confirmed" => Ok(AppointmentStatus::Confirmed),
        "completed" => Ok(AppointmentStatus::Completed),
        "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
        _ => bail!("unknown appointment status: {s}"),
    }
}

/// Export JSON de l'annuaire (jolie mise en forme)
pub fn export_directory_json<P: AsRef<Path>>(path: P, directory: &Directory) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(directory)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des rendez-vous: header `id,staff_handle,branch,date,start,end,status`
pub fn export_appointments_csv<P: AsRef<Path>>(
    path: P,
    directory: &Directory,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "staff_handle", "branch", "date", "start", "end", "status"])?;
    for a in &directory.appointments {
        let handle = directory
            .find_staff_by_id(&a.staff_id)
            .map(|s| s.handle.as_str())
            .unwrap_or("");
        let branch = directory
            .find_branch_by_id(&a.branch_id)
            .map(|b| b.name.as_str())
            .unwrap_or("");
        let date = a.date.to_string();
        let start = a.start.to_string();
        let end = a.end.to_string();
        let status = a.status.to_string();
        w.write_record([
            a.id.as_str(),
            handle,
            branch,
            date.as_str(),
            start.as_str(),
            end.as_str(),
            status.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
