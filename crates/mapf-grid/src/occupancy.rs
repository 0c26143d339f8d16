//! Cell-occupancy map: which agent, if any, stands on each cell.
//!
//! Backed by a flat row-major `Vec<AgentId>` with [`AgentId::INVALID`] as the
//! free-cell sentinel, mirroring the grid's SoA layout.  The coordinator is
//! the only writer; the invariant it maintains is *at most one agent per
//! cell*.

use mapf_core::{AgentId, GridPos};

use crate::error::{GridError, GridResult};

pub struct Occupancy {
    cells: Vec<AgentId>,
    rows: u16,
    cols: u16,
}

impl Occupancy {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            cells: vec![AgentId::INVALID; rows as usize * cols as usize],
            rows,
            cols,
        }
    }

    #[inline]
    fn idx(&self, pos: GridPos) -> usize {
        pos.row as usize * self.cols as usize + pos.col as usize
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// The agent standing on `pos`, or `None` if the cell is free.
    #[inline]
    pub fn occupant(&self, pos: GridPos) -> Option<AgentId> {
        let id = self.cells[self.idx(pos)];
        (id != AgentId::INVALID).then_some(id)
    }

    #[inline]
    pub fn is_free(&self, pos: GridPos) -> bool {
        self.cells[self.idx(pos)] == AgentId::INVALID
    }

    /// Place `agent` on `pos`.  Fails if the cell is already taken.
    pub fn place(&mut self, agent: AgentId, pos: GridPos) -> GridResult<()> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        let idx = self.idx(pos);
        if self.cells[idx] != AgentId::INVALID {
            return Err(GridError::CellOccupied(pos));
        }
        self.cells[idx] = agent;
        Ok(())
    }

    /// Free `pos`, verifying it was held by `agent`.
    pub fn vacate(&mut self, agent: AgentId, pos: GridPos) -> GridResult<()> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        let idx = self.idx(pos);
        if self.cells[idx] != agent {
            return Err(GridError::WrongOccupant(agent, pos));
        }
        self.cells[idx] = AgentId::INVALID;
        Ok(())
    }

    /// Move `agent` from `from` to `to` as one operation, so the at-most-one
    /// invariant holds before and after.
    pub fn relocate(&mut self, agent: AgentId, from: GridPos, to: GridPos) -> GridResult<()> {
        if !self.in_bounds(to) {
            return Err(GridError::OutOfBounds(to));
        }
        if self.cells[self.idx(to)] != AgentId::INVALID {
            return Err(GridError::CellOccupied(to));
        }
        self.vacate(agent, from)?;
        let idx = self.idx(to);
        self.cells[idx] = agent;
        Ok(())
    }

    /// All occupied cells with their occupants, in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (GridPos, AgentId)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &id)| {
            (id != AgentId::INVALID).then(|| {
                let row = (i / self.cols as usize) as u16;
                let col = (i % self.cols as usize) as u16;
                (GridPos::new(row, col), id)
            })
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != AgentId::INVALID).count()
    }
}
