use crate::error::Result;
use crate::model::{
    AreaView, ClaimReport, HoldingReport, KhewatReport, OwnerReport, OwnerSummaries, Parcel,
    ShareReport,
};
use crate::quantity::{format_fixed, Quantity};
use crate::units::to_mixed_radix;

impl AreaView {
    pub fn from_quantity(quantity: &Quantity) -> Result<Self> {
        let area = to_mixed_radix(quantity)?;
        Ok(Self {
            marlas: quantity.clone(),
            marlas_decimal: quantity.to_fixed(2),
            display: area.to_string(),
            compact: area.compact(),
            area,
        })
    }
}

/// Build the presentation structure from validated parcels and owners.
pub fn build_report(
    name: &str,
    total_land: &Quantity,
    parcels: &[Parcel],
    owners: &OwnerSummaries,
) -> Result<ShareReport> {
    let owners = owners
        .iter()
        .map(|owner| -> Result<OwnerReport> {
            let holdings = owner
                .holdings
                .iter()
                .map(|h| -> Result<HoldingReport> {
                    Ok(HoldingReport {
                        khewat: h.parcel_id.clone(),
                        khewat_area: AreaView::from_quantity(&h.parcel_total)?,
                        share_fraction: h.fraction.to_string(),
                        share: AreaView::from_quantity(&h.allocated)?,
                        remarks: h.remark.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(OwnerReport {
                name: owner.name.clone(),
                total: AreaView::from_quantity(&owner.total)?,
                remarks: owner.remark.clone(),
                holdings,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let khewats = parcels
        .iter()
        .map(|parcel| -> Result<KhewatReport> {
            let claims = parcel
                .claims()
                .iter()
                .map(|c| -> Result<ClaimReport> {
                    Ok(ClaimReport {
                        name: c.owner().to_string(),
                        share_fraction: c.fraction().to_string(),
                        share: AreaView::from_quantity(c.allocated())?,
                        remarks: c.remark().map(str::to_string),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(KhewatReport {
                id: parcel.id().to_string(),
                area: AreaView::from_quantity(parcel.total())?,
                share_sum: format_fixed(&parcel.share_sum(), 2),
                owners: claims,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ShareReport {
        name: name.to_string(),
        total: AreaView::from_quantity(total_land)?,
        owners,
        khewats,
    })
}
