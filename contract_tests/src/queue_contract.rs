//! Queue contract: FIFO delivery and bounded occupancy between real tasks.
